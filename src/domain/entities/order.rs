//! Order status update payload.
//!
//! Updates are checked against these types, but the payload as received is
//! what gets relayed. Nothing about them is stored.

use serde::Deserialize;
use validator::Validate;

/// New status of an order, with optional free-text reasons.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatus {
    pub status: String,

    #[serde(default)]
    pub reason: Option<String>,

    #[serde(default)]
    pub additional_reason: Option<String>,
}

/// An order status change addressed to a store and an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    #[validate(length(min = 1, message = "storeId must not be empty"))]
    pub store_id: String,

    #[validate(length(min = 1, message = "orderNo must not be empty"))]
    pub order_no: String,

    pub body: OrderStatus,
}
