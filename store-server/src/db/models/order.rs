//! Order Models
//!
//! Order 的身份一旦创建即不可变；可变字段只有 status / is_paid /
//! is_invoice_generated。OrderItem 永远携带下单时的价格和商品快照。

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{AddressSnapshot, OrderStatus, ProductSnapshot};
use surrealdb::RecordId;

// =============================================================================
// Order (主表)
// =============================================================================

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub status: OrderStatus,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_invoice_generated: bool,
    /// External payment proof, or a synthesized `COD-…` number
    pub transaction_number: String,
    /// items total + delivery fee, fixed at creation
    pub order_total: Decimal,
    pub delivery_fee: Decimal,
    /// Address copy taken at creation time (never a live reference)
    pub shipping: AddressSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub payment_method: Option<RecordId>,
    pub created_at: String,
}

// =============================================================================
// Order Item
// =============================================================================

/// Order line entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Plain string, not a record link: the product may be deleted later
    pub product_id: String,
    pub quantity: i64,
    /// Unit price at purchase time, never recomputed
    pub price_paid: Decimal,
    /// Denormalized name/price/variant at purchase time
    pub snapshot: ProductSnapshot,
}

// =============================================================================
// API Request / Response Types
// =============================================================================

/// Admin partial update for an order
///
/// Every updatable axis is an explicit `Option`: present means "set it",
/// absent means "leave it alone". Unknown status strings are rejected at
/// deserialization time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub is_paid: Option<bool>,
    #[serde(default)]
    pub generate_invoice: Option<bool>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.is_paid.is_none() && self.generate_invoice.is_none()
    }
}

/// Order with its items (checkout response / admin detail view)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_rejects_unknown_status() {
        let err = serde_json::from_str::<OrderPatch>(r#"{"status":"REFUNDED"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn patch_axes_are_independent() {
        let patch: OrderPatch =
            serde_json::from_str(r#"{"status":"SHIPPED","is_paid":true}"#).unwrap();
        assert_eq!(patch.status, Some(OrderStatus::Shipped));
        assert_eq!(patch.is_paid, Some(true));
        assert_eq!(patch.generate_invoice, None);

        let empty: OrderPatch = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
