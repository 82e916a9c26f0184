//! Shipping Address Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::AddressSnapshot;
use surrealdb::RecordId;

/// Shipping address entity, owned by a user
///
/// Orders never reference this row; they embed a snapshot taken at
/// creation time (see [`ShippingAddress::snapshot`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub street: String,
}

impl ShippingAddress {
    /// Denormalized copy embedded into orders at creation time
    pub fn snapshot(&self) -> AddressSnapshot {
        AddressSnapshot {
            recipient: self.recipient.clone(),
            phone: self.phone.clone(),
            country: self.country.clone(),
            city: self.city.clone(),
            street: self.street.clone(),
        }
    }
}

/// Create address payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressCreate {
    pub user_id: String,
    pub recipient: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    pub street: String,
}
