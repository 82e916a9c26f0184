//! Cart Models
//!
//! 每个用户一个购物车 (unique index `cart_user`)。同一商品+变体允许出现在
//! 多行 cart_item 中（独立的“加购”调用各自建行），下单前由聚合器合并。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Cart entity (1:1 with user)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
}

/// Cart line entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub cart: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    /// Always >= 1
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}
