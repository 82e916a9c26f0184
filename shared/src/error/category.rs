//! Error categories
//!
//! Coarse grouping of [`ErrorCode`](super::ErrorCode) values, used for
//! logging targets and client-side error presentation.

use serde::{Deserialize, Serialize};

/// Error category - the thousands digit of the error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// 0xxx: validation, not-found, conflicts
    General,
    /// 1xxx: authentication
    Auth,
    /// 2xxx: permission
    Permission,
    /// 4xxx: order workflow
    Order,
    /// 5xxx: payment
    Payment,
    /// 6xxx: product and stock
    Product,
    /// 9xxx: system / database
    System,
}

impl ErrorCategory {
    /// Category from a raw code value
    pub fn of(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            1 => Self::Auth,
            2 => Self::Permission,
            4 => Self::Order,
            5 => Self::Payment,
            6 => Self::Product,
            _ => Self::System,
        }
    }
}
