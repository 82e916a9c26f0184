//! Invoice Model
//!
//! 每个订单最多一张发票 (unique index `invoice_order`)，只创建一次，
//! 永不重新生成。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Invoice entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Human-readable, unique (`INV-YYYYMMDD-XXXXXX`)
    pub invoice_number: String,
    /// Storage reference for the rendered document
    pub document_url: String,
    pub created_at: String,
}
