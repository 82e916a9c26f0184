//! Schema definition
//!
//! Idempotent `DEFINE` statements executed at startup. Tables stay
//! schemaless; only the uniqueness constraints the workflow relies on are
//! declared here:
//!
//! - `user.email` unique: importer's create-if-absent race resolution
//! - `cart.user` unique: one cart per user
//! - `invoice.order` unique: at most one invoice per order
//! - `invoice.invoice_number` unique: human-readable number collisions retry
//! - `delivery_fee (country, city)` unique: one fee row per lookup key

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const DEFINE_STATEMENTS: &str = "
    DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;
    DEFINE INDEX IF NOT EXISTS cart_user ON TABLE cart COLUMNS user UNIQUE;
    DEFINE INDEX IF NOT EXISTS invoice_order ON TABLE invoice COLUMNS order UNIQUE;
    DEFINE INDEX IF NOT EXISTS invoice_number ON TABLE invoice COLUMNS invoice_number UNIQUE;
    DEFINE INDEX IF NOT EXISTS delivery_fee_key ON TABLE delivery_fee COLUMNS country, city UNIQUE;
    DEFINE INDEX IF NOT EXISTS order_user ON TABLE order COLUMNS user;
    DEFINE INDEX IF NOT EXISTS order_item_order ON TABLE order_item COLUMNS order;
    DEFINE INDEX IF NOT EXISTS cart_item_cart ON TABLE cart_item COLUMNS cart;
";

/// Apply all schema definitions (safe to run on every startup)
pub async fn define(db: &Surreal<Db>) -> Result<(), surrealdb::Error> {
    db.query(DEFINE_STATEMENTS).await?.check()?;
    Ok(())
}
