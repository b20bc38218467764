use crate::store::RepositoryError;

// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    /// Malformed or missing request fields. The message is safe to show the caller.
    #[error("Invalid order data: {0}")]
    InvalidInput(String),

    #[error("Order data too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: usize },

    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Order not found")]
    OrderNotFound,

    /// Storage failure. Display stays generic; the source carries the detail for logs.
    #[error("Error processing order")]
    Persistence(#[source] RepositoryError),
}

impl OrderError {
    /// Label used for the `outcome` dimension of intake metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            OrderError::InvalidInput(_) => "invalid_input",
            OrderError::PayloadTooLarge { .. } => "payload_too_large",
            OrderError::CustomerNotFound => "customer_not_found",
            OrderError::OrderNotFound => "order_not_found",
            OrderError::Persistence(_) => "persistence_error",
        }
    }
}
