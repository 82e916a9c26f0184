//! Inventory Ledger
//!
//! 两个职责：
//!
//! 1. `check_availability` - 事务前的点时读校验，逐项确认
//!    `stock_amount >= quantity`，第一个不足即失败，绝不部分预留。
//! 2. `guarded_decrement_statements` - 生成事务内的条件扣减语句：
//!    读到写都在同一条语句序列里（同一事务），库存不足直接 `THROW`
//!    中止整笔事务，杜绝两个并发结算抢最后一件库存的竞态。
//!    扣减与 `total_sales` 累加在同一条 UPDATE 里完成。

use super::MergedLine;
use super::error::{OrderError, THROW_INSUFFICIENT_STOCK, THROW_PRODUCT_GONE};
use crate::db::models::Product;
use crate::db::repository::ProductRepository;
use serde_json::{Map, Value, json};
use std::fmt::Write;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Point-in-time availability check, run before the order transaction
///
/// Returns the loaded products in line order (the caller prices and
/// snapshots from them). The race window left open here is closed by the
/// guarded decrement inside the transaction.
pub async fn check_availability(
    db: &Surreal<Db>,
    lines: &[MergedLine],
) -> Result<Vec<Product>, OrderError> {
    let repo = ProductRepository::new(db.clone());
    let mut products = Vec::with_capacity(lines.len());

    for line in lines {
        let product = repo
            .find_by_id(&line.product_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(format!("Product {}", line.product_id)))?;

        if product.stock_amount < line.quantity {
            return Err(OrderError::InsufficientStock {
                product_id: line.product_id.clone(),
                requested: line.quantity,
                available: product.stock_amount,
            });
        }
        products.push(product);
    }

    Ok(products)
}

/// Conditional decrement statements for lines `0..count`
///
/// Each line expands to: read current stock, `THROW` if the product vanished
/// or stock is short, then decrement stock and bump `total_sales` in one
/// UPDATE. Runs inside `BEGIN … COMMIT`, so any THROW rolls back everything.
pub fn guarded_decrement_statements(count: usize) -> String {
    let mut q = String::new();
    for i in 0..count {
        let _ = write!(
            q,
            "LET $stock{i} = (SELECT VALUE stock_amount FROM type::thing('product', $pid{i}))[0];\n\
             IF $stock{i} == NONE {{ THROW '{gone}' + $pid{i} }};\n\
             IF $stock{i} < $qty{i} {{ THROW '{short}' + $pid{i} + ':' + <string>$stock{i} }};\n\
             UPDATE type::thing('product', $pid{i}) SET stock_amount -= $qty{i}, total_sales += $qty{i};\n",
            gone = THROW_PRODUCT_GONE,
            short = THROW_INSUFFICIENT_STOCK,
        );
    }
    q
}

/// Bind `$pid{i}` / `$qty{i}` for every line
pub fn bind_decrement_params(bindings: &mut Map<String, Value>, lines: &[MergedLine]) {
    for (i, line) in lines.iter().enumerate() {
        bindings.insert(format!("pid{i}"), json!(line.product_id));
        bindings.insert(format!("qty{i}"), json!(line.quantity));
    }
}
