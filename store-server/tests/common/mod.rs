//! Shared seeding helpers for integration tests
#![allow(dead_code)]

use rust_decimal::Decimal;
use store_server::auth::CurrentUser;
use store_server::core::{Config, ServerState};
use store_server::db::models::{AddressCreate, ProductCreate, UserCreate};
use store_server::db::repository::{
    AddressRepository, CartRepository, PaymentMethodRepository, ProductRepository, UserRepository,
};

pub fn dec(value: i64, scale: u32) -> Decimal {
    Decimal::new(value, scale)
}

pub async fn test_state() -> ServerState {
    let config = Config::with_overrides("/tmp/coral-integration", 0);
    ServerState::initialize_in_memory(&config)
        .await
        .expect("in-memory state")
}

pub async fn seed_product(state: &ServerState, name: &str, price: Decimal, stock: i64) -> String {
    ProductRepository::new(state.db.clone())
        .create(ProductCreate {
            name: name.into(),
            price,
            stock_amount: stock,
            sizes: vec![],
            colors: vec![],
        })
        .await
        .expect("seed product")
        .id
        .expect("product id")
        .key()
        .to_string()
}

pub async fn seed_cod_method(state: &ServerState) -> String {
    PaymentMethodRepository::new(state.db.clone())
        .create("Cash on delivery", true)
        .await
        .expect("seed cod")
        .id
        .expect("method id")
        .key()
        .to_string()
}

/// 一个带好购物车与地址的买家
pub struct Buyer {
    pub user: CurrentUser,
    pub cart_id: String,
    pub address_id: String,
}

pub async fn seed_buyer(state: &ServerState, tag: usize, product_id: &str, qty: i64) -> Buyer {
    let user = UserRepository::new(state.db.clone())
        .create(UserCreate {
            email: format!("buyer{tag}@example.com"),
            name: format!("Buyer {tag}"),
        })
        .await
        .expect("seed user");
    let user_key = user.id.expect("user id").key().to_string();

    let cart_repo = CartRepository::new(state.db.clone());
    let cart = cart_repo.create(&user_key).await.expect("seed cart");
    let cart_id = cart.id.expect("cart id").key().to_string();
    cart_repo
        .add_item(&cart_id, product_id, qty, None, None)
        .await
        .expect("seed cart line");

    let address = AddressRepository::new(state.db.clone())
        .create(AddressCreate {
            user_id: user_key.clone(),
            recipient: format!("Buyer {tag}"),
            phone: None,
            country: "BD".into(),
            city: None,
            street: format!("{tag} Market Street"),
        })
        .await
        .expect("seed address");

    Buyer {
        user: CurrentUser {
            id: user_key,
            email: format!("buyer{tag}@example.com"),
            name: format!("Buyer {tag}"),
            role: "customer".into(),
        },
        cart_id,
        address_id: address.id.expect("address id").key().to_string(),
    }
}
