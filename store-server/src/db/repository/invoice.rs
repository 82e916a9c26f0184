//! Invoice Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, record_key};
use crate::db::models::Invoice;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// The order's invoice, if generated
    pub async fn find_by_order(&self, order_id: &str) -> RepoResult<Option<Invoice>> {
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE order = $order LIMIT 1")
            .bind(("order", record_id(ORDER_TABLE, order_id)))
            .await?
            .take(0)?;
        Ok(invoices.into_iter().next())
    }

    /// Persist the invoice row (1:1 with order)
    ///
    /// Unique indexes on `order` and `invoice_number` turn races into
    /// [`RepoError::Duplicate`]; callers either re-fetch (double generate)
    /// or retry with a fresh number (number collision).
    pub async fn create(
        &self,
        order_id: &str,
        invoice_number: &str,
        document_url: &str,
    ) -> RepoResult<Invoice> {
        let invoices: Vec<Invoice> = self
            .base
            .db()
            .query(
                "CREATE invoice SET order = type::thing('order', $order), \
                 invoice_number = $number, document_url = $url, created_at = $created_at",
            )
            .bind(("order", record_key(ORDER_TABLE, order_id).to_string()))
            .bind(("number", invoice_number.to_string()))
            .bind(("url", document_url.to_string()))
            .bind(("created_at", chrono::Utc::now().to_rfc3339()))
            .await?
            .take(0)?;
        invoices
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
    }
}
