//! Payment Method Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::PaymentMethod;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PAYMENT_METHOD_TABLE: &str = "payment_method";

#[derive(Clone)]
pub struct PaymentMethodRepository {
    base: BaseRepository,
}

impl PaymentMethodRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find payment method by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PaymentMethod>> {
        let method: Option<PaymentMethod> = self
            .base
            .db()
            .select((PAYMENT_METHOD_TABLE, record_key(PAYMENT_METHOD_TABLE, id)))
            .await?;
        Ok(method)
    }

    /// Create a payment method
    pub async fn create(&self, name: &str, is_cash_on_delivery: bool) -> RepoResult<PaymentMethod> {
        let method = PaymentMethod {
            id: None,
            name: name.to_string(),
            is_cash_on_delivery,
        };
        let created: Option<PaymentMethod> = self
            .base
            .db()
            .create(PAYMENT_METHOD_TABLE)
            .content(method)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment method".to_string()))
    }
}
