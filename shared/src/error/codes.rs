//! Unified error codes for the Coral Store platform
//!
//! All error codes are represented as u16 values for efficient serialization
//! and cross-language compatibility (Rust, TypeScript, etc.)

use super::ErrorCategory;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A u16 value that maps to no known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown error code: {0}")]
pub struct UnknownErrorCode(pub u16);

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Order ====================
    /// Cart has no items
    EmptyCart = 4001,
    /// Shipping address does not belong to the requester
    InvalidAddress = 4002,
    /// Order is not in a state that allows the operation
    InvalidOrderState = 4003,
    /// Status transition not allowed by the order state machine
    InvalidTransition = 4004,
    /// Concurrent modification, caller should retry
    ConcurrencyConflict = 4005,

    // ==================== 5xxx: Payment ====================
    /// Transaction proof required for non cash-on-delivery payment
    MissingTransactionProof = 5001,

    // ==================== 6xxx: Product ====================
    /// Not enough stock to satisfy the requested quantity
    InsufficientStock = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Category this code belongs to
    pub fn category(self) -> ErrorCategory {
        ErrorCategory::of(self as u16)
    }

    /// HTTP status this code maps to at the API boundary
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::MissingTransactionProof => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::NotFound | Self::InvalidAddress => StatusCode::NOT_FOUND,
            Self::AlreadyExists | Self::ConcurrencyConflict => StatusCode::CONFLICT,
            Self::EmptyCart
            | Self::InvalidOrderState
            | Self::InvalidTransition
            | Self::InsufficientStock => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Default message shown when no more specific one is supplied
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",
            Self::NotAuthenticated => "Authentication required",
            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin role required",
            Self::EmptyCart => "Cart is empty",
            Self::InvalidAddress => "Shipping address not found for this user",
            Self::InvalidOrderState => "Order state does not allow this operation",
            Self::InvalidTransition => "Status transition not allowed",
            Self::ConcurrencyConflict => "Concurrent modification, please retry",
            Self::MissingTransactionProof => "Transaction number is required",
            Self::InsufficientStock => "Insufficient stock",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            7 => Self::RequiredField,
            1001 => Self::NotAuthenticated,
            2001 => Self::PermissionDenied,
            2003 => Self::AdminRequired,
            4001 => Self::EmptyCart,
            4002 => Self::InvalidAddress,
            4003 => Self::InvalidOrderState,
            4004 => Self::InvalidTransition,
            4005 => Self::ConcurrencyConflict,
            5001 => Self::MissingTransactionProof,
            6001 => Self::InsufficientStock,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            other => return Err(UnknownErrorCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}
