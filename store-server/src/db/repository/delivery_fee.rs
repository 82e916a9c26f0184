//! Delivery Fee Repository
//!
//! 配送费解析只有这一处实现：结算与后台汇总共用同一条 fallback 链，
//! 不再各算各的。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::DeliveryFee;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const DELIVERY_FEE_TABLE: &str = "delivery_fee";

#[derive(Clone)]
pub struct DeliveryFeeRepository {
    base: BaseRepository,
}

impl DeliveryFeeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a fee row; `city = None` is the country-level fallback row
    pub async fn create(
        &self,
        country: &str,
        city: Option<&str>,
        amount: Decimal,
    ) -> RepoResult<DeliveryFee> {
        let fee = DeliveryFee {
            id: None,
            country: country.to_string(),
            city: city.map(str::to_string),
            amount,
        };
        let created: Option<DeliveryFee> = self
            .base
            .db()
            .create(DELIVERY_FEE_TABLE)
            .content(fee)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create delivery fee".to_string()))
    }

    /// Resolve the fee for an address
    ///
    /// Lookup chain: (country, city) → (country, NONE). Returns `None` when
    /// neither row exists; the caller applies the configured platform
    /// default.
    pub async fn resolve(&self, country: &str, city: Option<&str>) -> RepoResult<Option<Decimal>> {
        if let Some(city) = city {
            let exact: Vec<DeliveryFee> = self
                .base
                .db()
                .query("SELECT * FROM delivery_fee WHERE country = $country AND city = $city LIMIT 1")
                .bind(("country", country.to_string()))
                .bind(("city", city.to_string()))
                .await?
                .take(0)?;
            if let Some(fee) = exact.into_iter().next() {
                return Ok(Some(fee.amount));
            }
        }

        let country_level: Vec<DeliveryFee> = self
            .base
            .db()
            .query("SELECT * FROM delivery_fee WHERE country = $country AND city IS NONE LIMIT 1")
            .bind(("country", country.to_string()))
            .await?
            .take(0)?;
        Ok(country_level.into_iter().next().map(|fee| fee.amount))
    }
}
