//! Product Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product entity
///
/// `stock_amount` never goes negative: every decrement is guarded inside
/// the order transaction. `total_sales` only ever increases, in the same
/// statement as the decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Current unit price; orders snapshot it, never re-read it
    pub price: Decimal,
    pub stock_amount: i64,
    #[serde(default)]
    pub total_sales: i64,
    /// Available size variants (empty = no size selection)
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Available color variants (empty = no color selection)
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub price: Decimal,
    pub stock_amount: i64,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
}
