//! Cart Repository

use super::{BaseRepository, RepoError, RepoResult, record_id, record_key};
use crate::db::models::{Cart, CartItem};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const CART_TABLE: &str = "cart";
const CART_ITEM_TABLE: &str = "cart_item";

#[derive(Clone)]
pub struct CartRepository {
    base: BaseRepository,
}

impl CartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find cart by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Cart>> {
        let cart: Option<Cart> = self
            .base
            .db()
            .select((CART_TABLE, record_key(CART_TABLE, id)))
            .await?;
        Ok(cart)
    }

    /// Find the user's cart (1:1)
    pub async fn find_by_user(&self, user_id: &str) -> RepoResult<Option<Cart>> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("SELECT * FROM cart WHERE user = $user LIMIT 1")
            .bind(("user", record_id("user", user_id)))
            .await?
            .take(0)?;
        Ok(carts.into_iter().next())
    }

    /// Create a cart for a user
    ///
    /// The unique index on `cart.user` rejects a second cart. The user
    /// reference is stored as a real record link.
    pub async fn create(&self, user_id: &str) -> RepoResult<Cart> {
        let carts: Vec<Cart> = self
            .base
            .db()
            .query("CREATE cart SET user = type::thing('user', $user)")
            .bind(("user", record_key("user", user_id).to_string()))
            .await?
            .take(0)?;
        carts
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create cart".to_string()))
    }

    /// Add a line to a cart
    ///
    /// Deliberately appends a new row even when the same product+variant is
    /// already present; merging happens at checkout, not at add time.
    pub async fn add_item(
        &self,
        cart_id: &str,
        product_id: &str,
        quantity: i64,
        selected_size: Option<String>,
        selected_color: Option<String>,
    ) -> RepoResult<CartItem> {
        if quantity < 1 {
            return Err(RepoError::Validation("quantity must be at least 1".into()));
        }

        let items: Vec<CartItem> = self
            .base
            .db()
            .query(
                "CREATE cart_item SET cart = type::thing('cart', $cart), \
                 product = type::thing('product', $product), quantity = $quantity, \
                 selected_size = $size, selected_color = $color",
            )
            .bind(("cart", record_key(CART_TABLE, cart_id).to_string()))
            .bind(("product", record_key("product", product_id).to_string()))
            .bind(("quantity", quantity))
            .bind(("size", selected_size))
            .bind(("color", selected_color))
            .await?
            .take(0)?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create cart item".to_string()))
    }

    /// All lines of a cart
    pub async fn items(&self, cart_id: &str) -> RepoResult<Vec<CartItem>> {
        let items: Vec<CartItem> = self
            .base
            .db()
            .query("SELECT * FROM cart_item WHERE cart = $cart")
            .bind(("cart", record_id(CART_TABLE, cart_id)))
            .await?
            .take(0)?;
        Ok(items)
    }
}
