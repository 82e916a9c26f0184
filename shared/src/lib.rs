//! Shared domain types for the Coral Store platform
//!
//! Types in this crate are used by the store server and by clients
//! (admin panel, storefront) so that both sides agree on:
//!
//! - **Order lifecycle** (`order`): status enum, allowed transitions,
//!   and the snapshot types embedded into persisted orders
//! - **Error codes** (`error`): unified error codes and categories shared
//!   across the HTTP boundary

pub mod error;
pub mod order;

// Re-export 公共类型
pub use error::{ErrorCategory, ErrorCode};
pub use order::{AddressSnapshot, OrderStatus, ProductSnapshot};
