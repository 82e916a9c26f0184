//! Shipping Address Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{AddressCreate, ShippingAddress};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ADDRESS_TABLE: &str = "shipping_address";

#[derive(Clone)]
pub struct AddressRepository {
    base: BaseRepository,
}

impl AddressRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find address by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ShippingAddress>> {
        let address: Option<ShippingAddress> = self
            .base
            .db()
            .select((ADDRESS_TABLE, record_key(ADDRESS_TABLE, id)))
            .await?;
        Ok(address)
    }

    /// Create an address for a user (stored with a real record link)
    pub async fn create(&self, data: AddressCreate) -> RepoResult<ShippingAddress> {
        let addresses: Vec<ShippingAddress> = self
            .base
            .db()
            .query(
                "CREATE shipping_address SET user = type::thing('user', $user), \
                 recipient = $recipient, phone = $phone, country = $country, \
                 city = $city, street = $street",
            )
            .bind(("user", record_key("user", &data.user_id).to_string()))
            .bind(("recipient", data.recipient))
            .bind(("phone", data.phone))
            .bind(("country", data.country))
            .bind(("city", data.city))
            .bind(("street", data.street))
            .await?
            .take(0)?;
        addresses
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create address".to_string()))
    }
}
