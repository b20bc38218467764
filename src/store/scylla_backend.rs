use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scylla::client::session::Session;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::identity::{AccountRef, AccountRole, Identity};
use crate::domain::order::{Order, OrderDraft, OrderItem, OrderStatus};

use super::{IdentityStore, OrderRepository, RepositoryError};

// ============================================================================
// ScyllaDB Backends
// ============================================================================
//
// Tables:
//   orders   (id uuid PRIMARY KEY, ...)   one row per order, items as JSON text
//   accounts (id text PRIMARY KEY, ...)   read-only from this service
//
// A single-partition INSERT is atomic, so an order row is either fully
// written or absent.
//
// ============================================================================

const CREATE_ORDERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS orders (
    id uuid PRIMARY KEY,
    customer_display_name text,
    vendor text,
    items text,
    cost_estimate double,
    status text,
    created_at timestamp
)";

const CREATE_ACCOUNTS_TABLE: &str = "CREATE TABLE IF NOT EXISTS accounts (
    id text PRIMARY KEY,
    name text,
    role text
)";

const SELECT_ORDER_COLUMNS: &str =
    "SELECT id, customer_display_name, vendor, items, cost_estimate, status, created_at FROM orders";

type OrderRow = (Uuid, String, String, String, f64, String, DateTime<Utc>);

/// Create the keyspace and tables if they are missing, then switch to the keyspace.
pub async fn ensure_schema(session: &Session, keyspace: &str) -> anyhow::Result<()> {
    if keyspace.is_empty() || !keyspace.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!("Invalid keyspace name: {:?}", keyspace);
    }

    session
        .query_unpaged(
            format!(
                "CREATE KEYSPACE IF NOT EXISTS {} WITH REPLICATION = \
                 {{'class': 'SimpleStrategy', 'replication_factor': 1}}",
                keyspace
            ),
            &[],
        )
        .await?;

    session.use_keyspace(keyspace, false).await?;
    session.query_unpaged(CREATE_ORDERS_TABLE, &[]).await?;
    session.query_unpaged(CREATE_ACCOUNTS_TABLE, &[]).await?;

    tracing::info!(keyspace = %keyspace, "✅ Schema ready");
    Ok(())
}

fn storage_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(err.to_string())
}

fn order_from_row(row: OrderRow) -> Result<Order, RepositoryError> {
    let (id, customer_display_name, vendor, items_json, cost_estimate, status, created_at) = row;

    let items: Vec<OrderItem> = serde_json::from_str(&items_json).map_err(|e| {
        RepositoryError::Corrupt {
            id: id.to_string(),
            reason: format!("items: {}", e),
        }
    })?;

    let status = status
        .parse::<OrderStatus>()
        .map_err(|e| RepositoryError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })?;

    Ok(Order {
        id,
        customer_display_name,
        vendor,
        items,
        cost_estimate,
        status,
        created_at,
    })
}

pub struct ScyllaOrderRepository {
    session: Arc<Session>,
}

impl ScyllaOrderRepository {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl OrderRepository for ScyllaOrderRepository {
    async fn create(&self, draft: OrderDraft) -> Result<Order, RepositoryError> {
        let order = draft.into_order(Uuid::new_v4(), Utc::now());
        let items_json = serde_json::to_string(&order.items)?;

        self.session
            .query_unpaged(
                "INSERT INTO orders (id, customer_display_name, vendor, items, cost_estimate, status, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                (
                    order.id,
                    order.customer_display_name.as_str(),
                    order.vendor.as_str(),
                    items_json,
                    order.cost_estimate,
                    order.status.as_str(),
                    order.created_at,
                ),
            )
            .await
            .map_err(storage_error)?;

        tracing::debug!(order_id = %order.id, "Inserted order row");
        Ok(order)
    }

    async fn find_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let result = self
            .session
            .query_unpaged(SELECT_ORDER_COLUMNS, &[])
            .await
            .map_err(storage_error)?;

        let rows_result = match result.into_rows_result() {
            Ok(rows) => rows,
            Err(_) => return Ok(Vec::new()),
        };

        let mut orders = Vec::new();
        for row in rows_result.rows::<OrderRow>().map_err(storage_error)? {
            orders.push(order_from_row(row.map_err(storage_error)?)?);
        }

        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(orders)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let result = self
            .session
            .query_unpaged(format!("{} WHERE id = ?", SELECT_ORDER_COLUMNS), (id,))
            .await
            .map_err(storage_error)?;

        let rows_result = match result.into_rows_result() {
            Ok(rows) => rows,
            Err(_) => return Ok(None),
        };

        match rows_result.maybe_first_row::<OrderRow>().map_err(storage_error)? {
            Some(row) => order_from_row(row).map(Some),
            None => Ok(None),
        }
    }
}

pub struct ScyllaIdentityStore {
    session: Arc<Session>,
}

impl ScyllaIdentityStore {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl IdentityStore for ScyllaIdentityStore {
    async fn find_account(&self, account: &AccountRef) -> Result<Option<Identity>, RepositoryError> {
        let result = self
            .session
            .query_unpaged(
                "SELECT name, role FROM accounts WHERE id = ?",
                (account.as_str(),),
            )
            .await
            .map_err(storage_error)?;

        let rows_result = match result.into_rows_result() {
            Ok(rows) => rows,
            Err(_) => return Ok(None),
        };

        let Some((name, role)) = rows_result
            .maybe_first_row::<(String, String)>()
            .map_err(storage_error)?
        else {
            return Ok(None);
        };

        let role: AccountRole = role.parse().map_err(|reason| RepositoryError::Corrupt {
            id: account.to_string(),
            reason,
        })?;

        Ok(Some(Identity {
            id: account.clone(),
            name,
            role,
        }))
    }
}
