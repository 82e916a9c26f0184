//! 并发结算压力测试 - 超卖防护
//!
//! N 件库存、多于 N 个买家同时结算：无论交错如何，已提交订单卖出的
//! 总量绝不超过 N。正确性完全来自事务原子性 + 条件扣减，没有任何
//! 进程内锁。

mod common;

use common::{dec, seed_buyer, seed_cod_method, seed_product, test_state};
use futures::future::join_all;
use store_server::db::repository::{OrderRepository, ProductRepository};
use store_server::orders::{CheckoutService, OrderError, PlaceOrder};

const STOCK: i64 = 5;
const BUYERS: usize = 8;
const MAX_RETRIES: usize = 30;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_checkouts_never_oversell() {
    let state = test_state().await;
    let product_id = seed_product(&state, "Limited Run Print", dec(1000, 2), STOCK).await;
    let cod = seed_cod_method(&state).await;

    let mut buyers = Vec::new();
    for i in 0..BUYERS {
        buyers.push(seed_buyer(&state, i, &product_id, 1).await);
    }

    let tasks = buyers.into_iter().map(|buyer| {
        let service = CheckoutService::from_state(&state);
        let cod = cod.clone();
        tokio::spawn(async move {
            let input = PlaceOrder {
                cart_id: buyer.cart_id.clone(),
                shipping_address_id: buyer.address_id.clone(),
                payment_method_id: cod,
                transaction_number: None,
            };

            // 可重试错误就重试；真正的拒绝 (库存不足) 是终态
            for _ in 0..MAX_RETRIES {
                match service.place_order(&buyer.user, input.clone()).await {
                    Ok(detail) => return Ok(detail),
                    Err(OrderError::ConcurrencyConflict) => {
                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(OrderError::ConcurrencyConflict)
        })
    });

    let outcomes = join_all(tasks).await;

    let mut sold_units = 0i64;
    let mut rejected = 0usize;
    for outcome in outcomes {
        match outcome.expect("task panicked") {
            Ok(detail) => {
                assert_eq!(detail.items.len(), 1);
                sold_units += detail.items[0].quantity;
            }
            Err(OrderError::InsufficientStock { available, .. }) => {
                assert!(available < 1);
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    // 卖出的总量正好等于初始库存，一件不多
    assert_eq!(sold_units, STOCK);
    assert_eq!(rejected, BUYERS - STOCK as usize);

    let product = ProductRepository::new(state.db.clone())
        .find_by_id(&product_id)
        .await
        .expect("load product")
        .expect("product exists");
    assert_eq!(product.stock_amount, 0);
    assert_eq!(product.total_sales, STOCK);

    let orders = OrderRepository::new(state.db.clone())
        .list(100, 0)
        .await
        .expect("list orders");
    assert_eq!(orders.len(), STOCK as usize);
}
