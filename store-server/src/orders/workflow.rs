//! Order Workflow Engine
//!
//! `place_order` 把一次结算变成一笔全有或全无的数据库事务：
//! 校验地址归属 → 载入购物车 → 支付方式/交易号 → 合并行 + 可用性检查 →
//! 计算总额 → 事务内条件扣减 + 建单 + 清空购物车 → 提交后派发通知。
//!
//! 正确性不依赖进程内锁：并发结算之间的隔离完全来自事务原子性与
//! 条件写。事务受超时约束，超时即干净中止并返回可重试错误。

use rand::Rng;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use std::fmt::Write as _;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::OrderError;
use super::{MergedLine, inventory, merge_cart_lines};
use crate::auth::CurrentUser;
use crate::core::{Config, ServerState};
use crate::db::models::{OrderDetail, PaymentMethod, Product};
use crate::db::repository::{
    AddressRepository, CartRepository, DeliveryFeeRepository, OrderRepository,
    PaymentMethodRepository, record_id, record_key,
};
use crate::notify::NotifyService;
use shared::{OrderStatus, ProductSnapshot};

/// Checkout input
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub cart_id: String,
    pub shipping_address_id: String,
    pub payment_method_id: String,
    /// External payment proof; mandatory unless the method is
    /// cash-on-delivery
    pub transaction_number: Option<String>,
}

/// Checkout workflow service
#[derive(Clone)]
pub struct CheckoutService {
    db: Surreal<Db>,
    config: Config,
    notify: NotifyService,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>, config: Config, notify: NotifyService) -> Self {
        Self { db, config, notify }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(state.db.clone(), state.config.clone(), state.notify.clone())
    }

    /// Place an order from the user's cart
    ///
    /// Returns the created order with items; notification failures never
    /// surface here (the order is already committed).
    pub async fn place_order(
        &self,
        user: &CurrentUser,
        input: PlaceOrder,
    ) -> Result<OrderDetail, OrderError> {
        let user_key = record_key("user", &user.id).to_string();
        let user_ref = record_id("user", &user_key);

        // 1. Shipping address must exist and belong to the requester
        let address = AddressRepository::new(self.db.clone())
            .find_by_id(&input.shipping_address_id)
            .await?
            .ok_or(OrderError::InvalidAddress)?;
        if address.user != user_ref {
            return Err(OrderError::InvalidAddress);
        }

        // 2. Cart must exist, belong to the requester, and not be empty
        let cart_repo = CartRepository::new(self.db.clone());
        let cart = cart_repo
            .find_by_id(&input.cart_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Cart {}", input.cart_id)))?;
        if cart.user != user_ref {
            return Err(OrderError::Validation(
                "cart does not belong to the requesting user".into(),
            ));
        }
        let raw_lines = cart_repo.items(&input.cart_id).await?;
        if raw_lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        // 3. Payment method and transaction proof
        let method = PaymentMethodRepository::new(self.db.clone())
            .find_by_id(&input.payment_method_id)
            .await?
            .ok_or_else(|| {
                OrderError::NotFound(format!("Payment method {}", input.payment_method_id))
            })?;
        let transaction_number =
            resolve_transaction_number(&method, input.transaction_number.as_deref())?;

        // 4. Merge duplicate variant rows, then check availability
        let merged = merge_cart_lines(&raw_lines);
        let products = inventory::check_availability(&self.db, &merged).await?;

        // 5. Totals: item prices at this instant + resolved delivery fee
        let delivery_fee = DeliveryFeeRepository::new(self.db.clone())
            .resolve(&address.country, address.city.as_deref())
            .await?
            .unwrap_or(self.config.default_delivery_fee);
        let items_total: Decimal = merged
            .iter()
            .zip(&products)
            .map(|(line, product)| product.price * Decimal::from(line.quantity))
            .sum();
        let order_total = items_total + delivery_fee;

        // 6. The atomic unit: guarded decrements, order + items, cart clear
        let order_id = uuid::Uuid::new_v4().simple().to_string();
        let query = build_checkout_query(merged.len());
        let bindings = checkout_bindings(
            &order_id,
            &user_key,
            &input,
            &transaction_number,
            order_total,
            delivery_fee,
            &address.snapshot(),
            &merged,
            &products,
        );

        match run_raw_transaction(&self.db, query, bindings, self.config.txn_timeout_ms).await {
            Ok(()) => {}
            Err(RawTxnError::Timeout) => return Err(OrderError::ConcurrencyConflict),
            Err(RawTxnError::Db(e)) => return Err(OrderError::from_transaction(e, &merged)),
        }

        // 7. Committed: load the result, fire notifications, return
        let detail = OrderRepository::new(self.db.clone())
            .find_detail(&order_id)
            .await?
            .ok_or_else(|| {
                OrderError::Database(format!("Order {order_id} missing after commit"))
            })?;

        tracing::info!(
            order = %order_id,
            user = %user_key,
            total = %order_total,
            items = detail.items.len(),
            "order placed"
        );
        self.notify.spawn_order_confirmation(
            format!("order:{order_id}"),
            user.email.clone(),
            order_total,
        );

        Ok(detail)
    }
}

/// Non-COD methods require external proof; COD synthesizes a unique number
fn resolve_transaction_number(
    method: &PaymentMethod,
    supplied: Option<&str>,
) -> Result<String, OrderError> {
    match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(number) => Ok(number.to_string()),
        None if method.is_cash_on_delivery => {
            let millis = chrono::Utc::now().timestamp_millis();
            let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
            Ok(format!("COD-{millis}-{suffix:04}"))
        }
        None => Err(OrderError::MissingTransactionProof),
    }
}

fn build_checkout_query(line_count: usize) -> String {
    let mut q = String::from("BEGIN TRANSACTION;\n");
    q.push_str(&inventory::guarded_decrement_statements(line_count));
    q.push_str(
        "LET $created = CREATE ONLY type::thing('order', $order_id) CONTENT {\n\
             user: type::thing('user', $user_id),\n\
             status: $status,\n\
             is_paid: false,\n\
             is_invoice_generated: false,\n\
             transaction_number: $txn,\n\
             order_total: $order_total,\n\
             delivery_fee: $delivery_fee,\n\
             shipping: $shipping,\n\
             payment_method: type::thing('payment_method', $pm_id),\n\
             created_at: $created_at\n\
         };\n",
    );
    for i in 0..line_count {
        let _ = writeln!(
            q,
            "CREATE order_item CONTENT {{ order: $created.id, product_id: $pid{i}, \
             quantity: $qty{i}, price_paid: $price{i}, snapshot: $snap{i} }};"
        );
    }
    q.push_str("DELETE cart_item WHERE cart = type::thing('cart', $cart_id);\n");
    q.push_str("COMMIT TRANSACTION;\n");
    q
}

#[allow(clippy::too_many_arguments)]
fn checkout_bindings(
    order_id: &str,
    user_key: &str,
    input: &PlaceOrder,
    transaction_number: &str,
    order_total: Decimal,
    delivery_fee: Decimal,
    shipping: &shared::AddressSnapshot,
    lines: &[MergedLine],
    products: &[Product],
) -> Map<String, Value> {
    let mut bindings = Map::new();
    bindings.insert("order_id".into(), json!(order_id));
    bindings.insert("user_id".into(), json!(user_key));
    bindings.insert("status".into(), json!(OrderStatus::Pending));
    bindings.insert("txn".into(), json!(transaction_number));
    bindings.insert("order_total".into(), json!(order_total));
    bindings.insert("delivery_fee".into(), json!(delivery_fee));
    bindings.insert("shipping".into(), json!(shipping));
    bindings.insert(
        "pm_id".into(),
        json!(record_key("payment_method", &input.payment_method_id)),
    );
    bindings.insert("created_at".into(), json!(chrono::Utc::now().to_rfc3339()));
    bindings.insert(
        "cart_id".into(),
        json!(record_key("cart", &input.cart_id)),
    );

    inventory::bind_decrement_params(&mut bindings, lines);
    for (i, (line, product)) in lines.iter().zip(products).enumerate() {
        let snapshot = ProductSnapshot {
            name: product.name.clone(),
            price: product.price,
            selected_size: line.selected_size.clone(),
            selected_color: line.selected_color.clone(),
        };
        bindings.insert(format!("price{i}"), json!(product.price));
        bindings.insert(format!("snap{i}"), json!(snapshot));
    }

    bindings
}

// =============================================================================
// Shared transaction runner
// =============================================================================

/// Raw failure of a transactional query, before sentinel translation
pub(crate) enum RawTxnError {
    /// Bounded timeout hit: the transaction was aborted, caller may retry
    Timeout,
    Db(surrealdb::Error),
}

/// Run a `BEGIN … COMMIT` query with the configured timeout
///
/// The whole statement sequence commits or rolls back as one unit; hitting
/// the timeout surfaces a retryable conflict to the caller.
///
/// On failure every statement in the transaction reports an error, but only
/// one carries the root cause (a `THROW` or an engine conflict); the rest
/// are "query was not executed" cascade markers. The root cause is returned.
pub(crate) async fn run_raw_transaction(
    db: &Surreal<Db>,
    query: String,
    bindings: Map<String, Value>,
    timeout_ms: u64,
) -> Result<(), RawTxnError> {
    let fut = async {
        let mut response = db.query(query).bind(Value::Object(bindings)).await?;
        let mut errors: Vec<(usize, surrealdb::Error)> =
            response.take_errors().into_iter().collect();
        if errors.is_empty() {
            return Ok(());
        }
        errors.sort_by_key(|(idx, _)| *idx);
        let root = errors
            .iter()
            .position(|(_, e)| !e.to_string().contains("not executed"))
            .unwrap_or(0);
        Err(errors.swap_remove(root).1)
    };

    match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Err(_) => Err(RawTxnError::Timeout),
        Ok(Err(e)) => Err(RawTxnError::Db(e)),
        Ok(Ok(())) => Ok(()),
    }
}
