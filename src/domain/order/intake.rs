use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::identity::{IdentityError, IdentityResolver};
use crate::metrics::Metrics;
use crate::store::OrderRepository;

use super::aggregate::{Order, OrderDraft};
use super::commands::SubmitOrder;
use super::errors::OrderError;
use super::events::{OrderEvent, OrderNotifier};
use super::normalizer::normalize_items;

// ============================================================================
// Order Intake - Orchestrates a submission end to end
// ============================================================================
//
// ReceivingInput → ResolvingIdentity → Normalizing → Persisting
//   → Broadcasting → Completed
//
// Any stage before Broadcasting may fail the submission. Nothing is
// announced unless the order was stored. Once stored, the submission
// succeeds no matter what happens to the announcement.
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStage {
    ReceivingInput,
    ResolvingIdentity,
    Normalizing,
    Persisting,
    Broadcasting,
    Completed,
}

impl fmt::Display for IntakeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntakeStage::ReceivingInput => "receiving_input",
            IntakeStage::ResolvingIdentity => "resolving_identity",
            IntakeStage::Normalizing => "normalizing",
            IntakeStage::Persisting => "persisting",
            IntakeStage::Broadcasting => "broadcasting",
            IntakeStage::Completed => "completed",
        };
        f.write_str(name)
    }
}

pub struct OrderIntake {
    identities: IdentityResolver,
    orders: Arc<dyn OrderRepository>,
    notifier: Arc<dyn OrderNotifier>,
    metrics: Arc<Metrics>,
}

impl OrderIntake {
    pub fn new(
        identities: IdentityResolver,
        orders: Arc<dyn OrderRepository>,
        notifier: Arc<dyn OrderNotifier>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            identities,
            orders,
            notifier,
            metrics,
        }
    }

    /// Take a customer's order: resolve, normalize, store, announce.
    pub async fn submit(&self, command: SubmitOrder) -> Result<Order, OrderError> {
        let started = Instant::now();
        let result = self.run(command).await;

        let outcome = match &result {
            Ok(_) => "created",
            Err(e) => e.outcome(),
        };
        self.metrics.record_intake(outcome, started.elapsed().as_secs_f64());

        result
    }

    async fn run(&self, command: SubmitOrder) -> Result<Order, OrderError> {
        let mut stage = IntakeStage::ReceivingInput;
        command.validate().map_err(|e| self.fail(stage, e))?;

        stage = advance(stage, IntakeStage::ResolvingIdentity);
        let identity = self
            .identities
            .resolve(&command.customer)
            .await
            .map_err(|e| match e {
                IdentityError::NotFound(customer_ref) => {
                    tracing::warn!(customer_ref = %customer_ref, "Customer not found");
                    self.fail(stage, OrderError::CustomerNotFound)
                }
                IdentityError::Store(source) => self.fail(stage, OrderError::Persistence(source)),
            })?;

        stage = advance(stage, IntakeStage::Normalizing);
        let items = normalize_items(&command.items);

        stage = advance(stage, IntakeStage::Persisting);
        let draft = OrderDraft {
            customer_display_name: identity.name,
            vendor: command.vendor,
            items,
            cost_estimate: command.cost_estimate,
        };
        let order = self
            .orders
            .create(draft)
            .await
            .map_err(|e| self.fail(stage, OrderError::Persistence(e)))?;

        tracing::info!(
            order_id = %order.id,
            customer = %order.customer_display_name,
            vendor = %order.vendor,
            item_count = order.items.len(),
            "✅ Order created"
        );

        stage = advance(stage, IntakeStage::Broadcasting);
        let event = OrderEvent::Created(order.clone());
        let event_name = event.name();
        if let Err(e) = self.notifier.publish(event) {
            // The order already exists; a missed announcement never fails the submission.
            tracing::warn!(
                order_id = %order.id,
                event = event_name,
                error = %e,
                "Failed to broadcast order event"
            );
        }

        advance(stage, IntakeStage::Completed);
        Ok(order)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.orders.find_all().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to list orders");
            OrderError::Persistence(e)
        })
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, OrderError> {
        match self.orders.find_by_id(id).await {
            Ok(Some(order)) => Ok(order),
            Ok(None) => Err(OrderError::OrderNotFound),
            Err(e) => {
                tracing::error!(order_id = %id, error = %e, "Failed to load order");
                Err(OrderError::Persistence(e))
            }
        }
    }

    fn fail(&self, stage: IntakeStage, err: OrderError) -> OrderError {
        match &err {
            OrderError::Persistence(source) => {
                tracing::error!(stage = %stage, error = %err, source = %source, "Order intake failed");
            }
            _ => {
                tracing::warn!(stage = %stage, error = %err, "Order intake rejected");
            }
        }
        err
    }
}

fn advance(from: IntakeStage, to: IntakeStage) -> IntakeStage {
    tracing::debug!(from = %from, to = %to, "Intake stage transition");
    to
}

// ============================================================================
// Unit Tests
// ============================================================================
