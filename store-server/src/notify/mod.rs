//! 通知与单据渲染边界
//!
//! 邮件投递和 PDF 渲染都是外部协作者。本模块只定义 trait 边界和
//! fire-and-forget 的派发：副作用在订单事务提交之后通过 `tokio::spawn`
//! 发出，失败只记日志，绝不回滚或阻塞已提交的订单。

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// 通知 sink：`send(recipient, subject, body)`
///
/// 生产环境接 SMTP/ESP 适配器；默认实现只打日志。
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// 单据渲染服务：结构化订单数据 → 渲染字节
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render_invoice(&self, document: &InvoiceDocument) -> anyhow::Result<Vec<u8>>;
}

/// 发票渲染输入 - 结构化订单数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub order_id: String,
    pub recipient: String,
    pub lines: Vec<InvoiceLine>,
    pub delivery_fee: Decimal,
    pub order_total: Decimal,
}

/// 发票行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

// =============================================================================
// Default (log-only) implementations
// =============================================================================

/// Log-only notification sink (development / tests)
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn send(&self, recipient: &str, subject: &str, _body: &str) -> anyhow::Result<()> {
        info!(target: "notify", recipient = %recipient, subject = %subject, "notification sent");
        Ok(())
    }
}

/// Log-only document renderer (development / tests)
pub struct LogRenderer;

#[async_trait]
impl DocumentRenderer for LogRenderer {
    async fn render_invoice(&self, document: &InvoiceDocument) -> anyhow::Result<Vec<u8>> {
        info!(target: "notify", invoice = %document.invoice_number, "invoice rendered");
        // Plain-text stand-in for the real PDF service
        Ok(serde_json::to_vec_pretty(document)?)
    }
}

// =============================================================================
// NotifyService
// =============================================================================

/// 通知服务 - 持有 sink/renderer 的共享引用并负责 fire-and-forget 派发
#[derive(Clone)]
pub struct NotifyService {
    sink: Arc<dyn NotificationSink>,
    renderer: Arc<dyn DocumentRenderer>,
    operator_email: String,
}

impl NotifyService {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        renderer: Arc<dyn DocumentRenderer>,
        operator_email: String,
    ) -> Self {
        Self {
            sink,
            renderer,
            operator_email,
        }
    }

    /// 下单确认：同时通知顾客与店铺运营
    ///
    /// 订单已提交，这里的失败只能降级为 warn 日志。
    pub fn spawn_order_confirmation(
        &self,
        order_id: String,
        customer_email: String,
        order_total: Decimal,
    ) {
        let sink = self.sink.clone();
        let operator = self.operator_email.clone();
        tokio::spawn(async move {
            let subject = format!("Order confirmation {order_id}");
            let body = format!("Your order {order_id} was placed. Total: {order_total}.");
            let op_body = format!("New order {order_id} from {customer_email}. Total: {order_total}.");

            let (customer_sent, operator_sent) = futures::join!(
                sink.send(&customer_email, &subject, &body),
                sink.send(&operator, &subject, &op_body),
            );
            if let Err(e) = customer_sent {
                warn!(target: "notify", order = %order_id, error = %e, "customer confirmation failed");
            }
            if let Err(e) = operator_sent {
                warn!(target: "notify", order = %order_id, error = %e, "operator notification failed");
            }
        });
    }

    /// 发票交付：渲染单据并邮寄给顾客
    ///
    /// Invoice 行已持久化；渲染/投递失败不撤销发票，只记日志。
    pub fn spawn_invoice_delivery(&self, document: InvoiceDocument, customer_email: String) {
        let sink = self.sink.clone();
        let renderer = self.renderer.clone();
        tokio::spawn(async move {
            let number = document.invoice_number.clone();
            match renderer.render_invoice(&document).await {
                Ok(bytes) => {
                    let subject = format!("Invoice {number}");
                    let body = format!(
                        "Your invoice {number} is ready ({} bytes rendered).",
                        bytes.len()
                    );
                    if let Err(e) = sink.send(&customer_email, &subject, &body).await {
                        warn!(target: "notify", invoice = %number, error = %e, "invoice email failed");
                    }
                }
                Err(e) => {
                    warn!(target: "notify", invoice = %number, error = %e, "invoice rendering failed");
                }
            }
        });
    }
}
