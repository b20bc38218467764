use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::order::{Order, OrderDraft};

use super::RepositoryError;

// ============================================================================
// Order Repository - Source of truth for order state
// ============================================================================
//
// `create` assigns the order id and creation time. It either stores the whole
// order or nothing. `find_all` on an empty store is an empty list, not an error.
//
// ============================================================================

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError>;
}

/// Process-local repository used for development and tests.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepositoryError> {
        let order = draft.into_order(Uuid::new_v4(), Utc::now());

        self.orders.write().await.insert(order.id, order.clone());

        tracing::debug!(order_id = %order.id, "Stored order in memory");
        Ok(order)
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }
}
