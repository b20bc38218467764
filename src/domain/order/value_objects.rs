use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Order Value Objects
// ============================================================================

/// Page count assumed when the submitter did not say how long a document is.
pub const DEFAULT_PAGE_COUNT: u32 = 1;

/// Lifecycle status of an order. New orders always start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "accepted" => Ok(OrderStatus::Accepted),
            "in_progress" => Ok(OrderStatus::InProgress),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Uploaded document attached to an order item.
///
/// `file_path` is an opaque locator handed out by blob storage; the intake
/// core never dereferences it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub file_path: String,
    pub page_count: u32,
}

/// Caller-supplied print configuration (paper size, color, copies, ...).
/// Passed through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrintOptions(pub serde_json::Value);

/// Canonical item shape stored on an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// `None` for print-text-only items that carry no uploaded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
    #[serde(default)]
    pub print_options: PrintOptions,
}

/// Item descriptor as submitted by the storefront.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default)]
    pub file_name: Option<String>,
    /// Storage locator of the uploaded file, if any.
    #[serde(default)]
    pub s3_url: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub print_options: PrintOptions,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_wire_names() {
        assert_eq!(serde_json::to_value(OrderStatus::Pending).unwrap(), json!("pending"));
        assert_eq!(serde_json::to_value(OrderStatus::InProgress).unwrap(), json!("in_progress"));
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_order_status_from_str() {
        let statuses = [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ];

        for status in statuses {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }

        assert_eq!(
            "shipped".parse::<OrderStatus>(),
            Err(UnknownStatus("shipped".to_string()))
        );
    }

    #[test]
    fn test_item_without_document_omits_field() {
        let item = OrderItem {
            document: None,
            print_options: PrintOptions(json!({"color": false})),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"printOptions": {"color": false}}));
    }

    #[test]
    fn test_raw_item_accepts_storefront_keys() {
        let raw: RawItem = serde_json::from_value(json!({
            "fileName": "a.pdf",
            "s3Url": "/blob/a",
            "pages": 3,
            "printOptions": {"copies": 2},
            "uploadedBy": "ignored"
        }))
        .unwrap();

        assert_eq!(raw.file_name.as_deref(), Some("a.pdf"));
        assert_eq!(raw.s3_url.as_deref(), Some("/blob/a"));
        assert_eq!(raw.pages, Some(3));
        assert_eq!(raw.print_options.0.get("copies"), Some(&json!(2)));
    }

    #[test]
    fn test_raw_item_defaults() {
        let raw: RawItem = serde_json::from_value(json!({})).unwrap();
        assert_eq!(raw, RawItem::default());
        assert_eq!(raw.print_options, PrintOptions(serde_json::Value::Null));
    }
}
