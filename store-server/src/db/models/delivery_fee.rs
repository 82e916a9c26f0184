//! Delivery Fee Model
//!
//! 费率表，按 (country, city) 唯一。city 缺省的行是该国的兜底费率。
//! 订单流程只读取此表。

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Delivery fee row
///
/// `city` is omitted from the record entirely when absent so the
/// country-level fallback row can be matched with `city IS NONE`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryFee {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub amount: Decimal,
}
