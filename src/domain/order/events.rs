use uuid::Uuid;

use super::aggregate::Order;

// ============================================================================
// Order Events - Announced to live vendor clients
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum OrderEvent {
    /// A new order was durably stored.
    Created(Order),
}

impl OrderEvent {
    /// Channel event name seen by subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            OrderEvent::Created(_) => "order.created",
        }
    }

    pub fn order(&self) -> &Order {
        match self {
            OrderEvent::Created(order) => order,
        }
    }

    pub fn order_id(&self) -> Uuid {
        self.order().id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BroadcastError {
    #[error("notification broadcaster is not running")]
    Unavailable,

    #[error("notification broadcaster is overloaded")]
    Overloaded,
}

/// Outbound side of the order pipeline. Delivery is best-effort; `Ok` means
/// the event was handed to the fan-out, not that anyone received it.
pub trait OrderNotifier: Send + Sync {
    fn publish(&self, event: OrderEvent) -> Result<(), BroadcastError>;
}
