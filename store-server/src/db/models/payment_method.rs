//! Payment Method Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Payment method entity
///
/// Cash-on-delivery methods need no upfront transaction proof; every other
/// method requires the caller to supply one at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub is_cash_on_delivery: bool,
}
