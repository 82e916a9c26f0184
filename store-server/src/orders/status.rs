//! Admin status updates
//!
//! PATCH 语义：显式的部分更新结构 [`OrderPatch`]，每个可变轴都是
//! `Option`——status 与 is_paid 相互独立，可在一次调用里同时更新；
//! `generate_invoice` 触发发票生成器 (只在 PENDING 下合法，成功后
//! 订单已被强制转入 PROCESSING)。

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::error::OrderError;
use super::invoice::{InvoiceOutcome, InvoiceService};
use crate::core::{Config, ServerState};
use crate::db::models::{OrderDetail, OrderPatch};
use crate::db::repository::{OrderRepository, record_key};
use crate::notify::NotifyService;

/// Admin order mutation service
#[derive(Clone)]
pub struct OrderAdminService {
    db: Surreal<Db>,
    config: Config,
    notify: NotifyService,
}

impl OrderAdminService {
    pub fn new(db: Surreal<Db>, config: Config, notify: NotifyService) -> Self {
        Self { db, config, notify }
    }

    pub fn from_state(state: &ServerState) -> Self {
        Self::new(state.db.clone(), state.config.clone(), state.notify.clone())
    }

    /// Apply a partial update to an order
    ///
    /// Invoice generation runs first (it force-moves PENDING → PROCESSING);
    /// an explicit status change is then validated against the freshest
    /// state before being applied together with `is_paid`.
    pub async fn apply_patch(
        &self,
        order_id: &str,
        patch: OrderPatch,
    ) -> Result<OrderDetail, OrderError> {
        if patch.is_empty() {
            return Err(OrderError::Validation(
                "at least one of status, is_paid, generate_invoice is required".into(),
            ));
        }

        let order_key = record_key("order", order_id).to_string();
        let repo = OrderRepository::new(self.db.clone());

        // Existence check up front so every axis reports the same NotFound
        let mut order = repo
            .find_by_id(&order_key)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Order {order_key}")))?;

        if patch.generate_invoice == Some(true) {
            let invoice_service =
                InvoiceService::new(self.db.clone(), self.config.clone(), self.notify.clone());
            match invoice_service.generate(&order_key).await? {
                InvoiceOutcome::Generated(_) | InvoiceOutcome::AlreadyGenerated => {
                    // Status may have moved to PROCESSING; re-read for the
                    // transition check below.
                    order = repo
                        .find_by_id(&order_key)
                        .await?
                        .ok_or_else(|| OrderError::NotFound(format!("Order {order_key}")))?;
                }
            }
        }

        if let Some(next) = patch.status
            && !order.status.can_transition(next)
        {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        let updated = repo
            .update_flags(&order_key, patch.status, patch.is_paid)
            .await?;
        let items = repo.items(&order_key).await?;

        tracing::info!(
            order = %order_key,
            status = %updated.status,
            is_paid = updated.is_paid,
            "order updated"
        );

        Ok(OrderDetail {
            order: updated,
            items,
        })
    }
}
