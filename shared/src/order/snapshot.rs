//! Snapshots embedded into persisted orders
//!
//! Product and address data are mutable (and products can be deleted), so
//! orders carry a denormalized copy taken at purchase time. Historical
//! orders stay accurate no matter what happens to the catalog afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product snapshot - name/price/variant at purchase time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product name
    pub name: String,
    /// Unit price at purchase time
    pub price: Decimal,
    /// Selected size variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    /// Selected color variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

/// Shipping address snapshot - copied onto the order at creation time
///
/// Never a live reference: editing or deleting the address afterwards must
/// not change what the order shipped to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AddressSnapshot {
    /// Recipient full name
    pub recipient: String,
    /// Contact phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// ISO-ish country name or code as entered
    pub country: String,
    /// City, if provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Street line
    pub street: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_serializes_price_as_number() {
        let snap = ProductSnapshot {
            name: "Linen Shirt".into(),
            price: Decimal::new(2999, 2),
            selected_size: Some("M".into()),
            selected_color: None,
        };
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json["price"].is_number());
        assert!(json.get("selected_color").is_none());
    }
}
