//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod address;
pub mod cart;
pub mod delivery_fee;
pub mod invoice;
pub mod order;
pub mod payment_method;
pub mod product;
pub mod user;

// Re-exports
pub use address::AddressRepository;
pub use cart::CartRepository;
pub use delivery_fee::DeliveryFeeRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;
pub use payment_method::PaymentMethodRepository;
pub use product::ProductRepository;
pub use user::UserRepository;

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as a generic database error; the
        // importer's create-if-absent path needs to tell them apart.
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// API 层传递的 ID 可以带或不带表前缀；repository 统一通过 [`record_id`]
// 归一化为 RecordId 后再查询。

/// Build a RecordId from a possibly table-prefixed id string
pub fn record_id(table: &str, id: &str) -> RecordId {
    let key = id
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id);
    RecordId::from_table_key(table, key)
}

/// Key part of a possibly table-prefixed id string
pub fn record_key<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
