//! Data Models
//!
//! Entity structs mapped to SurrealDB tables plus the create/update DTOs
//! used by repositories and handlers.

pub mod address;
pub mod cart;
pub mod delivery_fee;
pub mod invoice;
pub mod order;
pub mod payment_method;
pub mod product;
pub mod serde_helpers;
pub mod user;

pub use address::{AddressCreate, ShippingAddress};
pub use cart::{Cart, CartItem};
pub use delivery_fee::DeliveryFee;
pub use invoice::Invoice;
pub use order::{Order, OrderDetail, OrderItem, OrderPatch};
pub use payment_method::PaymentMethod;
pub use product::{Product, ProductCreate};
pub use user::{User, UserCreate};
