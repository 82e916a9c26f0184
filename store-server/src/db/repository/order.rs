//! Order Repository
//!
//! 读取与旗标更新。订单/订单项的创建只发生在 `orders` 模块的事务查询里，
//! 这里不提供裸的 create。

use super::{BaseRepository, RepoError, RepoResult, record_id, record_key};
use crate::db::models::{Order, OrderDetail, OrderItem};
use shared::OrderStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self
            .base
            .db()
            .select((ORDER_TABLE, record_key(ORDER_TABLE, id)))
            .await?;
        Ok(order)
    }

    /// All items of an order
    pub async fn items(&self, order_id: &str) -> RepoResult<Vec<OrderItem>> {
        let items: Vec<OrderItem> = self
            .base
            .db()
            .query("SELECT * FROM order_item WHERE order = $order")
            .bind(("order", record_id(ORDER_TABLE, order_id)))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Order with its items
    pub async fn find_detail(&self, order_id: &str) -> RepoResult<Option<OrderDetail>> {
        let Some(order) = self.find_by_id(order_id).await? else {
            return Ok(None);
        };
        let items = self.items(order_id).await?;
        Ok(Some(OrderDetail { order, items }))
    }

    /// List orders, newest first (paginated)
    pub async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit.max(1)))
            .bind(("offset", offset.max(0)))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// List a user's orders, newest first
    pub async fn list_by_user(&self, user_id: &str) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", record_id("user", user_id)))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Update the mutable flags of an order in one statement
    ///
    /// Only the supplied axes are touched; identity fields stay immutable.
    pub async fn update_flags(
        &self,
        order_id: &str,
        status: Option<OrderStatus>,
        is_paid: Option<bool>,
    ) -> RepoResult<Order> {
        let mut set_parts: Vec<&str> = Vec::new();
        if status.is_some() {
            set_parts.push("status = $status");
        }
        if is_paid.is_some() {
            set_parts.push("is_paid = $is_paid");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(order_id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)));
        }

        let query_str = format!(
            "UPDATE $order SET {} RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("order", record_id(ORDER_TABLE, order_id)));
        if let Some(status) = status {
            query = query.bind(("status", status));
        }
        if let Some(is_paid) = is_paid {
            query = query.bind(("is_paid", is_paid));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", order_id)))
    }
}
