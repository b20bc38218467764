use serde::Deserialize;

use super::errors::OrderError;
use super::value_objects::RawItem;

// ============================================================================
// Order Commands - Represent user intent
// ============================================================================

/// A customer's request to place a print order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOrder {
    /// Opaque account reference; existence is decided by identity resolution.
    pub customer: String,
    pub vendor: String,
    pub cost_estimate: f64,
    pub items: Vec<RawItem>,
}

/// Envelope as it arrives on the wire, before required fields are checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderEnvelope {
    customer: Option<String>,
    vendor: Option<String>,
    cost_estimate: Option<f64>,
    items: Option<Vec<RawItem>>,
}

impl SubmitOrder {
    /// Parse the storefront's JSON order envelope.
    pub fn parse(json: &[u8]) -> Result<Self, OrderError> {
        let envelope: OrderEnvelope = serde_json::from_slice(json)
            .map_err(|e| OrderError::InvalidInput(format!("malformed order data: {}", e)))?;

        let command = Self {
            customer: envelope
                .customer
                .ok_or_else(|| missing("customer"))?,
            vendor: envelope.vendor.ok_or_else(|| missing("vendor"))?,
            cost_estimate: envelope
                .cost_estimate
                .ok_or_else(|| missing("costEstimate"))?,
            items: envelope.items.ok_or_else(|| missing("items"))?,
        };

        command.validate()?;
        Ok(command)
    }

    /// Check the field rules that hold regardless of how the command was built.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.vendor.trim().is_empty() {
            return Err(OrderError::InvalidInput("vendor must not be empty".to_string()));
        }

        if !self.cost_estimate.is_finite() {
            return Err(OrderError::InvalidInput(
                "costEstimate must be a finite number".to_string(),
            ));
        }

        if self.items.is_empty() {
            return Err(OrderError::InvalidInput("items must not be empty".to_string()));
        }

        Ok(())
    }
}

fn missing(field: &str) -> OrderError {
    OrderError::InvalidInput(format!("{} is required", field))
}
