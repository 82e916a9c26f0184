//! Order workflow errors
//!
//! 工作流内的任何失败都导致整笔事务回滚；这里的类型把回滚原因
//! 翻译成调用方可以行动的错误。事务内用 `THROW` 哨兵字符串中止，
//! [`OrderError::from_transaction`] 负责把哨兵解析回类型化错误。

use crate::db::repository::RepoError;
use crate::utils::AppError;
use shared::{ErrorCode, OrderStatus};
use thiserror::Error;

// ── THROW sentinels (embedded in transactional queries) ─────────────

pub(crate) const THROW_INSUFFICIENT_STOCK: &str = "InsufficientStock:";
pub(crate) const THROW_PRODUCT_GONE: &str = "ProductGone:";
pub(crate) const THROW_ORDER_GONE: &str = "OrderGone:";
pub(crate) const THROW_INVALID_STATE: &str = "InvalidOrderState:";
pub(crate) const THROW_ALREADY_GENERATED: &str = "AlreadyGenerated";

/// Order workflow error taxonomy
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Cart has no items")]
    EmptyCart,

    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: String,
        requested: i64,
        available: i64,
    },

    #[error("Shipping address does not belong to the requesting user")]
    InvalidAddress,

    #[error("Transaction number is required for non cash-on-delivery payment")]
    MissingTransactionProof,

    #[error("Order is {current}, operation requires PENDING")]
    InvalidOrderState { current: String },

    #[error("Status transition {from} -> {to} is not allowed")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Transaction aborted by concurrent activity, retry")]
    ConcurrencyConflict,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl OrderError {
    /// Translate a failed transactional query into a typed error
    ///
    /// `lines` supplies the requested quantity for insufficient-stock
    /// sentinels (the THROW message only carries product id + available).
    pub(crate) fn from_transaction(
        err: surrealdb::Error,
        lines: &[crate::orders::MergedLine],
    ) -> Self {
        let msg = err.to_string();

        if let Some(rest) = after(&msg, THROW_INSUFFICIENT_STOCK) {
            let mut parts = rest.splitn(2, ':');
            let product_id = parts.next().unwrap_or_default().to_string();
            let available = parts
                .next()
                .map(leading_int)
                .unwrap_or(0);
            let requested = lines
                .iter()
                .find(|l| l.product_id == product_id)
                .map(|l| l.quantity)
                .unwrap_or(0);
            return Self::InsufficientStock {
                product_id,
                requested,
                available,
            };
        }

        if let Some(rest) = after(&msg, THROW_PRODUCT_GONE) {
            return Self::NotFound(format!("Product {}", ident(rest)));
        }

        if let Some(rest) = after(&msg, THROW_ORDER_GONE) {
            return Self::NotFound(format!("Order {}", ident(rest)));
        }

        if let Some(rest) = after(&msg, THROW_INVALID_STATE) {
            return Self::InvalidOrderState {
                current: ident(rest).to_string(),
            };
        }

        // Engine-level transaction conflicts are retryable
        let lowered = msg.to_lowercase();
        if lowered.contains("conflict") || lowered.contains("failed transaction") {
            return Self::ConcurrencyConflict;
        }

        Self::Database(msg)
    }
}

fn after<'a>(msg: &'a str, sentinel: &str) -> Option<&'a str> {
    msg.find(sentinel).map(|i| &msg[i + sentinel.len()..])
}

/// Leading identifier chars (the driver may append quotes or context)
fn ident(s: &str) -> &str {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(s.len());
    &s[..end]
}

fn leading_int(s: &str) -> i64 {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().unwrap_or(0)
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => Self::NotFound(msg),
            RepoError::Validation(msg) => Self::Validation(msg),
            // Unique index hit while we thought we were first: someone else
            // committed in between, ask the caller to retry.
            RepoError::Duplicate(_) => Self::ConcurrencyConflict,
            RepoError::Database(msg) => Self::Database(msg),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::EmptyCart => {
                AppError::business_rule(ErrorCode::EmptyCart, OrderError::EmptyCart.to_string())
            }
            e @ OrderError::InsufficientStock { .. } => {
                AppError::business_rule(ErrorCode::InsufficientStock, e.to_string())
            }
            e @ OrderError::InvalidAddress => {
                AppError::business_rule(ErrorCode::InvalidAddress, e.to_string())
            }
            e @ OrderError::MissingTransactionProof => {
                AppError::business_rule(ErrorCode::MissingTransactionProof, e.to_string())
            }
            e @ OrderError::InvalidOrderState { .. } => {
                AppError::business_rule(ErrorCode::InvalidOrderState, e.to_string())
            }
            e @ OrderError::InvalidTransition { .. } => {
                AppError::business_rule(ErrorCode::InvalidTransition, e.to_string())
            }
            e @ OrderError::ConcurrencyConflict => {
                AppError::business_rule(ErrorCode::ConcurrencyConflict, e.to_string())
            }
            OrderError::NotFound(msg) => AppError::NotFound(msg),
            OrderError::Database(msg) => AppError::Database(msg),
        }
    }
}
