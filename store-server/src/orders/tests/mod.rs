//! 订单工作流测试 - 全部跑在内存数据库上
//!
//! 每个测试独立初始化一个 ServerState (Mem 引擎)，互不共享状态。

mod test_import;
mod test_invoice;
mod test_status;

use rust_decimal::Decimal;

use crate::auth::CurrentUser;
use crate::core::{Config, ServerState};
use crate::db::models::{AddressCreate, ProductCreate, User, UserCreate};
use crate::db::repository::{
    AddressRepository, CartRepository, DeliveryFeeRepository, PaymentMethodRepository,
    ProductRepository, UserRepository,
};
use crate::orders::{CheckoutService, PlaceOrder};

pub(crate) fn dec(value: i64, scale: u32) -> Decimal {
    Decimal::new(value, scale)
}

pub(crate) async fn test_state() -> ServerState {
    let config = Config::with_overrides("/tmp/coral-test", 0);
    ServerState::initialize_in_memory(&config)
        .await
        .expect("in-memory state")
}

fn user_key(user: &User) -> String {
    user.id.as_ref().expect("user id").key().to_string()
}

pub(crate) async fn seed_user(state: &ServerState, email: &str, name: &str) -> CurrentUser {
    let user = UserRepository::new(state.db.clone())
        .create(UserCreate {
            email: email.into(),
            name: name.into(),
        })
        .await
        .expect("seed user");
    CurrentUser {
        id: user_key(&user),
        email: email.into(),
        name: name.into(),
        role: "customer".into(),
    }
}

pub(crate) async fn seed_product(
    state: &ServerState,
    name: &str,
    price: Decimal,
    stock: i64,
) -> String {
    let product = ProductRepository::new(state.db.clone())
        .create(ProductCreate {
            name: name.into(),
            price,
            stock_amount: stock,
            sizes: vec!["M".into(), "L".into()],
            colors: vec![],
        })
        .await
        .expect("seed product");
    product.id.expect("product id").key().to_string()
}

pub(crate) async fn stock_of(state: &ServerState, product_id: &str) -> (i64, i64) {
    let product = ProductRepository::new(state.db.clone())
        .find_by_id(product_id)
        .await
        .expect("load product")
        .expect("product exists");
    (product.stock_amount, product.total_sales)
}

/// 一套可直接结算的夹具：用户 + 购物车 + 地址 (BD/Dhaka) + 两种支付方式
pub(crate) struct Fixture {
    pub state: ServerState,
    pub user: CurrentUser,
    pub cart_id: String,
    pub address_id: String,
    pub cod_method: String,
    pub bank_method: String,
}

pub(crate) async fn checkout_fixture() -> Fixture {
    let state = test_state().await;
    let user = seed_user(&state, "buyer@example.com", "Buyer").await;

    let cart = CartRepository::new(state.db.clone())
        .create(&user.id)
        .await
        .expect("seed cart");
    let address = AddressRepository::new(state.db.clone())
        .create(AddressCreate {
            user_id: user.id.clone(),
            recipient: "Buyer".into(),
            phone: Some("017000000".into()),
            country: "BD".into(),
            city: Some("Dhaka".into()),
            street: "12 Lake Road".into(),
        })
        .await
        .expect("seed address");

    let pm_repo = PaymentMethodRepository::new(state.db.clone());
    let cod = pm_repo
        .create("Cash on delivery", true)
        .await
        .expect("seed cod");
    let bank = pm_repo
        .create("Bank transfer", false)
        .await
        .expect("seed bank");

    Fixture {
        user,
        cart_id: cart.id.expect("cart id").key().to_string(),
        address_id: address.id.expect("address id").key().to_string(),
        cod_method: cod.id.expect("cod id").key().to_string(),
        bank_method: bank.id.expect("bank id").key().to_string(),
        state,
    }
}

impl Fixture {
    pub(crate) async fn add_line(
        &self,
        product_id: &str,
        quantity: i64,
        size: Option<&str>,
        color: Option<&str>,
    ) {
        CartRepository::new(self.state.db.clone())
            .add_item(
                &self.cart_id,
                product_id,
                quantity,
                size.map(str::to_string),
                color.map(str::to_string),
            )
            .await
            .expect("add cart line");
    }

    pub(crate) async fn seed_fee(&self, country: &str, city: Option<&str>, amount: Decimal) {
        DeliveryFeeRepository::new(self.state.db.clone())
            .create(country, city, amount)
            .await
            .expect("seed fee");
    }

    pub(crate) fn checkout(&self) -> CheckoutService {
        CheckoutService::from_state(&self.state)
    }

    pub(crate) fn place_input(&self, method: &str, txn: Option<&str>) -> PlaceOrder {
        PlaceOrder {
            cart_id: self.cart_id.clone(),
            shipping_address_id: self.address_id.clone(),
            payment_method_id: method.to_string(),
            transaction_number: txn.map(str::to_string),
        }
    }

    pub(crate) async fn cart_line_count(&self) -> usize {
        CartRepository::new(self.state.db.clone())
            .items(&self.cart_id)
            .await
            .expect("cart items")
            .len()
    }
}
