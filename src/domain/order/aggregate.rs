use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::{OrderItem, OrderStatus};

// ============================================================================
// Order Aggregate
// ============================================================================
//
// An order is written once by the intake pipeline and read back by vendors.
// `customer_display_name` is copied from the customer's account when the
// order is taken and is never refreshed afterwards.
//
// ============================================================================

/// Order as persisted and returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_display_name: String,
    pub vendor: String,
    pub items: Vec<OrderItem>,
    pub cost_estimate: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Everything the intake pipeline knows about an order before storage
/// assigns its identity and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub customer_display_name: String,
    pub vendor: String,
    pub items: Vec<OrderItem>,
    pub cost_estimate: f64,
}

impl OrderDraft {
    /// Finalize the draft into a pending order.
    pub fn into_order(self, id: Uuid, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_display_name: self.customer_display_name,
            vendor: self.vendor,
            items: self.items,
            cost_estimate: self.cost_estimate,
            status: OrderStatus::Pending,
            created_at,
        }
    }
}
