//! Manual Order Importer
//!
//! 管理端的另一个建单入口：历史/线下销售补录。行项目带显式价格，
//! 不做实时库存/价格查询，也跳过可用性检查——它代表已经发生的履约。
//! Order/OrderItem/Invoice 三者仍共享同一套持久化不变量，并在一笔
//! 事务内一起创建，状态固定为 DELIVERED / is_paid / is_invoice_generated。

use rand::Rng;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};
use std::fmt::Write as _;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::OrderError;
use super::invoice::synth_invoice_number;
use super::workflow::{RawTxnError, run_raw_transaction};
use crate::core::{Config, ServerState};
use crate::db::models::{OrderDetail, User, UserCreate};
use crate::db::repository::{OrderRepository, RepoError, UserRepository};
use shared::{AddressSnapshot, OrderStatus, ProductSnapshot};

/// One imported line with its explicit historical price
#[derive(Debug, Clone)]
pub struct ManualOrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

/// Manual/historical order input
#[derive(Debug, Clone)]
pub struct ManualOrder {
    pub customer_email: String,
    pub customer_name: String,
    pub lines: Vec<ManualOrderLine>,
    pub shipping: AddressSnapshot,
    /// External proof if one exists; synthesized otherwise
    pub transaction_number: Option<String>,
    /// Historical fee; defaults to zero when unknown
    pub delivery_fee: Option<Decimal>,
}

/// Outcome of the create-if-absent user step
#[derive(Debug)]
pub enum UserHandle {
    Created(User),
    Existing(User),
}

impl UserHandle {
    pub fn user(&self) -> &User {
        match self {
            Self::Created(u) | Self::Existing(u) => u,
        }
    }
}

/// Manual order import service (admin only at the API layer)
#[derive(Clone)]
pub struct ImportService {
    db: Surreal<Db>,
    config: Config,
}

impl ImportService {
    pub fn new(db: Surreal<Db>, config: Config) -> Self {
        Self { db, config }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(state.db.clone(), state.config.clone())
    }

    /// Import a historical order
    pub async fn import(&self, input: ManualOrder) -> Result<OrderDetail, OrderError> {
        validate(&input)?;

        let handle = self
            .find_or_create_user(&input.customer_email, &input.customer_name)
            .await?;
        let user_key = handle
            .user()
            .id
            .as_ref()
            .map(|id| id.key().to_string())
            .ok_or_else(|| OrderError::Database("user row missing id".into()))?;

        let delivery_fee = input.delivery_fee.unwrap_or(Decimal::ZERO);
        let items_total: Decimal = input
            .lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.quantity))
            .sum();
        let order_total = items_total + delivery_fee;

        let transaction_number = input
            .transaction_number
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| {
                let millis = chrono::Utc::now().timestamp_millis();
                let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
                format!("MANUAL-{millis}-{suffix:04}")
            });

        let order_id = uuid::Uuid::new_v4().simple().to_string();
        let query = build_import_query(input.lines.len());

        // Retry only on invoice-number collisions; each attempt is one
        // all-or-nothing transaction.
        for _ in 0..3 {
            let invoice_number = synth_invoice_number();
            let bindings = import_bindings(
                &order_id,
                &user_key,
                &input,
                &transaction_number,
                order_total,
                delivery_fee,
                &invoice_number,
            );

            match run_raw_transaction(&self.db, query.clone(), bindings, self.config.txn_timeout_ms)
                .await
            {
                Ok(()) => {
                    let detail = OrderRepository::new(self.db.clone())
                        .find_detail(&order_id)
                        .await?
                        .ok_or_else(|| {
                            OrderError::Database(format!("Order {order_id} missing after commit"))
                        })?;
                    tracing::info!(
                        order = %order_id,
                        customer = %input.customer_email,
                        created_user = matches!(handle, UserHandle::Created(_)),
                        "manual order imported"
                    );
                    return Ok(detail);
                }
                Err(RawTxnError::Timeout) => return Err(OrderError::ConcurrencyConflict),
                Err(RawTxnError::Db(e)) if e.to_string().contains("invoice_number") => continue,
                Err(RawTxnError::Db(e)) => return Err(OrderError::Database(e.to_string())),
            }
        }

        Err(OrderError::Database(
            "could not allocate a unique invoice number".into(),
        ))
    }

    /// Idempotent on the unique email: a create racing into a duplicate
    /// re-fetches instead of erroring.
    pub async fn find_or_create_user(
        &self,
        email: &str,
        name: &str,
    ) -> Result<UserHandle, OrderError> {
        let repo = UserRepository::new(self.db.clone());

        if let Some(user) = repo.find_by_email(email).await? {
            return Ok(UserHandle::Existing(user));
        }

        match repo
            .create(UserCreate {
                email: email.to_string(),
                name: name.to_string(),
            })
            .await
        {
            Ok(user) => Ok(UserHandle::Created(user)),
            Err(RepoError::Duplicate(_)) => {
                // Lost the race: someone created this email in between
                let user = repo
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| OrderError::Database("user vanished after conflict".into()))?;
                Ok(UserHandle::Existing(user))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn validate(input: &ManualOrder) -> Result<(), OrderError> {
    if input.customer_email.trim().is_empty() {
        return Err(OrderError::Validation("customer_email is required".into()));
    }
    if input.lines.is_empty() {
        return Err(OrderError::Validation(
            "at least one order line is required".into(),
        ));
    }
    for line in &input.lines {
        if line.quantity < 1 {
            return Err(OrderError::Validation(format!(
                "quantity for {} must be at least 1",
                line.product_id
            )));
        }
        if line.unit_price < Decimal::ZERO {
            return Err(OrderError::Validation(format!(
                "unit_price for {} must not be negative",
                line.product_id
            )));
        }
    }
    Ok(())
}

fn build_import_query(line_count: usize) -> String {
    let mut q = String::from("BEGIN TRANSACTION;\n");
    q.push_str(
        "LET $created = CREATE ONLY type::thing('order', $order_id) CONTENT {\n\
             user: type::thing('user', $user_id),\n\
             status: $status,\n\
             is_paid: true,\n\
             is_invoice_generated: true,\n\
             transaction_number: $txn,\n\
             order_total: $order_total,\n\
             delivery_fee: $delivery_fee,\n\
             shipping: $shipping,\n\
             payment_method: NONE,\n\
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
    q.push_str(
        "CREATE invoice CONTENT { order: $created.id, invoice_number: $invoice_number, \
         document_url: $document_url, created_at: $created_at };\n",
    );
    q.push_str("COMMIT TRANSACTION;\n");
    q
}

fn import_bindings(
    order_id: &str,
    user_key: &str,
    input: &ManualOrder,
    transaction_number: &str,
    order_total: Decimal,
    delivery_fee: Decimal,
    invoice_number: &str,
) -> Map<String, Value> {
    let mut bindings = Map::new();
    bindings.insert("order_id".into(), json!(order_id));
    bindings.insert("user_id".into(), json!(user_key));
    bindings.insert("status".into(), json!(OrderStatus::Delivered));
    bindings.insert("txn".into(), json!(transaction_number));
    bindings.insert("order_total".into(), json!(order_total));
    bindings.insert("delivery_fee".into(), json!(delivery_fee));
    bindings.insert("shipping".into(), json!(input.shipping));
    bindings.insert("created_at".into(), json!(chrono::Utc::now().to_rfc3339()));
    bindings.insert("invoice_number".into(), json!(invoice_number));
    bindings.insert(
        "document_url".into(),
        json!(format!("/documents/invoices/{invoice_number}.pdf")),
    );

    for (i, line) in input.lines.iter().enumerate() {
        let snapshot = ProductSnapshot {
            name: line.name.clone(),
            price: line.unit_price,
            selected_size: line.selected_size.clone(),
            selected_color: line.selected_color.clone(),
        };
        bindings.insert(format!("pid{i}"), json!(line.product_id));
        bindings.insert(format!("qty{i}"), json!(line.quantity));
        bindings.insert(format!("price{i}"), json!(line.unit_price));
        bindings.insert(format!("snap{i}"), json!(snapshot));
    }

    bindings
}
