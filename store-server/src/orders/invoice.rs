//! Invoice Generator
//!
//! 订单级幂等：`is_invoice_generated` 已置位则直接返回
//! [`InvoiceOutcome::AlreadyGenerated`]，不报错也不重复生成。
//!
//! 生成路径是一笔事务：校验订单仍为 PENDING → 按订单项条件扣减库存
//! (延迟入账模型：建单时未占用库存的手工单在此刻落账) → 置位
//! `is_invoice_generated` 并强制转入 PROCESSING。事务提交后才合成
//! 发票号、落 Invoice 行，再派发渲染与邮寄副作用——它们失败不会
//! 撤销已创建的发票记录。

use rand::Rng;
use serde_json::{Map, json};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::{
    OrderError, THROW_ALREADY_GENERATED, THROW_INVALID_STATE, THROW_ORDER_GONE,
};
use super::workflow::{RawTxnError, run_raw_transaction};
use super::{MergedLine, inventory};
use crate::core::{Config, ServerState};
use crate::db::models::{Invoice, Order, OrderItem};
use crate::db::repository::{
    InvoiceRepository, OrderRepository, RepoError, UserRepository, record_key,
};
use crate::notify::{InvoiceDocument, InvoiceLine, NotifyService};

/// Result of an invoice generation attempt
#[derive(Debug)]
pub enum InvoiceOutcome {
    /// A new invoice was created
    Generated(Invoice),
    /// The order already has its invoice; nothing was changed
    AlreadyGenerated,
}

/// Invoice generation service
#[derive(Clone)]
pub struct InvoiceService {
    db: Surreal<Db>,
    config: Config,
    notify: NotifyService,
}

impl InvoiceService {
    pub fn new(db: Surreal<Db>, config: Config, notify: NotifyService) -> Self {
        Self { db, config, notify }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(state.db.clone(), state.config.clone(), state.notify.clone())
    }

    /// Generate the order's invoice (idempotent at the order level)
    pub async fn generate(&self, order_id: &str) -> Result<InvoiceOutcome, OrderError> {
        let order_key = record_key("order", order_id).to_string();
        let order_repo = OrderRepository::new(self.db.clone());

        let order = order_repo
            .find_by_id(&order_key)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {order_key}")))?;
        if order.is_invoice_generated {
            return Ok(InvoiceOutcome::AlreadyGenerated);
        }

        let items = order_repo.items(&order_key).await?;
        let lines: Vec<MergedLine> = items
            .iter()
            .map(|item| MergedLine {
                product_id: record_key("product", &item.product_id).to_string(),
                quantity: item.quantity,
                selected_size: item.snapshot.selected_size.clone(),
                selected_color: item.snapshot.selected_color.clone(),
            })
            .collect();

        // State gate + deferred stock commit + flag flip, all-or-nothing
        let query = build_generate_query(lines.len());
        let mut bindings = Map::new();
        bindings.insert("order_id".into(), json!(&order_key));
        inventory::bind_decrement_params(&mut bindings, &lines);

        match run_raw_transaction(&self.db, query, bindings, self.config.txn_timeout_ms).await {
            Ok(()) => {}
            Err(RawTxnError::Timeout) => return Err(OrderError::ConcurrencyConflict),
            Err(RawTxnError::Db(e)) => {
                // A concurrent generate won the transaction: idempotent no-op
                if e.to_string().contains(THROW_ALREADY_GENERATED) {
                    return Ok(InvoiceOutcome::AlreadyGenerated);
                }
                return Err(OrderError::from_transaction(e, &lines));
            }
        }

        // Committed: allocate a unique human-readable number, persist the row
        let invoice = self.persist_invoice_row(&order_key).await?;

        tracing::info!(
            order = %order_key,
            invoice = %invoice.invoice_number,
            "invoice generated"
        );
        self.spawn_delivery(&order, &items, &invoice).await;

        Ok(InvoiceOutcome::Generated(invoice))
    }

    /// Create the Invoice row, retrying number collisions
    ///
    /// The unique index on `invoice_number` is the arbiter; a handful of
    /// retries is plenty for a date-scoped 6-digit suffix.
    async fn persist_invoice_row(&self, order_key: &str) -> Result<Invoice, OrderError> {
        let repo = InvoiceRepository::new(self.db.clone());

        for _ in 0..3 {
            let number = synth_invoice_number();
            let document_url = format!("/documents/invoices/{number}.pdf");
            match repo.create(order_key, &number, &document_url).await {
                Ok(invoice) => return Ok(invoice),
                Err(RepoError::Duplicate(msg)) if msg.contains("invoice_number") => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(OrderError::Database(
            "could not allocate a unique invoice number".into(),
        ))
    }

    /// Render + email, fire-and-forget
    async fn spawn_delivery(&self, order: &Order, items: &[OrderItem], invoice: &Invoice) {
        let customer_email = match UserRepository::new(self.db.clone())
            .find_by_id(&order.user.key().to_string())
            .await
        {
            Ok(Some(user)) => user.email,
            _ => {
                tracing::warn!(invoice = %invoice.invoice_number, "customer not found, skipping invoice email");
                return;
            }
        };

        let document = InvoiceDocument {
            invoice_number: invoice.invoice_number.clone(),
            order_id: order.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            recipient: order.shipping.recipient.clone(),
            lines: items
                .iter()
                .map(|item| InvoiceLine {
                    name: item.snapshot.name.clone(),
                    quantity: item.quantity,
                    unit_price: item.price_paid,
                })
                .collect(),
            delivery_fee: order.delivery_fee,
            order_total: order.order_total,
        };
        self.notify.spawn_invoice_delivery(document, customer_email);
    }
}

fn build_generate_query(line_count: usize) -> String {
    let mut q = String::from("BEGIN TRANSACTION;\n");
    q.push_str(&format!(
        "LET $o = (SELECT * FROM type::thing('order', $order_id))[0];\n\
         IF $o == NONE {{ THROW '{gone}' + $order_id }};\n\
         IF $o.is_invoice_generated {{ THROW '{dup}' }};\n\
         IF $o.status != 'PENDING' {{ THROW '{state}' + <string>$o.status }};\n",
        gone = THROW_ORDER_GONE,
        dup = THROW_ALREADY_GENERATED,
        state = THROW_INVALID_STATE,
    ));
    q.push_str(&inventory::guarded_decrement_statements(line_count));
    q.push_str(
        "UPDATE type::thing('order', $order_id) SET is_invoice_generated = true, status = 'PROCESSING';\n",
    );
    q.push_str("COMMIT TRANSACTION;\n");
    q
}

/// Human-readable unique number: `INV-YYYYMMDD-XXXXXX`
pub(crate) fn synth_invoice_number() -> String {
    let date = chrono::Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("INV-{date}-{suffix:06}")
}
