use super::*;
use crate::db::models::{Invoice, OrderPatch};
use crate::db::repository::{InvoiceRepository, OrderRepository};
use crate::orders::{InvoiceOutcome, InvoiceService, OrderAdminService, OrderError};
use shared::OrderStatus;

async fn invoice_rows(state: &ServerState) -> Vec<Invoice> {
    state
        .db
        .query("SELECT * FROM invoice")
        .await
        .expect("query invoices")
        .take::<Vec<Invoice>>(0)
        .expect("decode invoices")
}

/// 下单一件商品，返回 (order_key, product_key)
async fn place_one(fx: &Fixture, stock: i64, qty: i64) -> (String, String) {
    let pid = seed_product(&fx.state, "Ceramic Vase", dec(2500, 2), stock).await;
    fx.add_line(&pid, qty, None, None).await;
    let detail = fx
        .checkout()
        .place_order(&fx.user, fx.place_input(&fx.cod_method, None))
        .await
        .expect("checkout succeeds");
    let order_key = detail.order.id.expect("order id").key().to_string();
    (order_key, pid)
}

#[tokio::test]
async fn generate_is_idempotent_per_order() {
    let fx = checkout_fixture().await;
    let (order_key, pid) = place_one(&fx, 10, 2).await;
    assert_eq!(stock_of(&fx.state, &pid).await, (8, 2));

    let service = InvoiceService::from_state(&fx.state);

    let first = service.generate(&order_key).await.expect("first generate");
    let invoice = match first {
        InvoiceOutcome::Generated(invoice) => invoice,
        InvoiceOutcome::AlreadyGenerated => panic!("expected a fresh invoice"),
    };
    assert!(invoice.invoice_number.starts_with("INV-"));
    assert!(invoice.document_url.contains(&invoice.invoice_number));

    // Deferred stock commit mirrors the checkout decrement
    assert_eq!(stock_of(&fx.state, &pid).await, (6, 4));

    let order = OrderRepository::new(fx.state.db.clone())
        .find_by_id(&order_key)
        .await
        .expect("load order")
        .expect("order exists");
    assert!(order.is_invoice_generated);
    assert_eq!(order.status, OrderStatus::Processing);

    // Second call: no-op signal, still exactly one invoice row
    let second = service.generate(&order_key).await.expect("second generate");
    assert!(matches!(second, InvoiceOutcome::AlreadyGenerated));
    assert_eq!(invoice_rows(&fx.state).await.len(), 1);
    assert_eq!(stock_of(&fx.state, &pid).await, (6, 4));
}

#[tokio::test]
async fn generate_on_shipped_order_changes_nothing() {
    let fx = checkout_fixture().await;
    let (order_key, pid) = place_one(&fx, 10, 2).await;

    OrderAdminService::from_state(&fx.state)
        .apply_patch(
            &order_key,
            OrderPatch {
                status: Some(OrderStatus::Shipped),
                ..Default::default()
            },
        )
        .await
        .expect("ship order");

    let err = InvoiceService::from_state(&fx.state)
        .generate(&order_key)
        .await
        .expect_err("must fail");
    match err {
        OrderError::InvalidOrderState { current } => assert_eq!(current, "SHIPPED"),
        other => panic!("expected InvalidOrderState, got {other:?}"),
    }

    // Stock and status untouched, no invoice row
    assert_eq!(stock_of(&fx.state, &pid).await, (8, 2));
    let order = OrderRepository::new(fx.state.db.clone())
        .find_by_id(&order_key)
        .await
        .expect("load order")
        .expect("order exists");
    assert_eq!(order.status, OrderStatus::Shipped);
    assert!(!order.is_invoice_generated);
    assert!(invoice_rows(&fx.state).await.is_empty());
}

#[tokio::test]
async fn generate_aborts_when_deferred_stock_is_short() {
    let fx = checkout_fixture().await;
    // Checkout takes the whole stock; the deferred commit at generate time
    // has nothing left to draw from.
    let (order_key, pid) = place_one(&fx, 2, 2).await;
    assert_eq!(stock_of(&fx.state, &pid).await, (0, 2));

    let err = InvoiceService::from_state(&fx.state)
        .generate(&order_key)
        .await
        .expect_err("must fail");
    assert!(matches!(err, OrderError::InsufficientStock { .. }));

    // Whole transaction rolled back: flag unset, status still PENDING
    let order = OrderRepository::new(fx.state.db.clone())
        .find_by_id(&order_key)
        .await
        .expect("load order")
        .expect("order exists");
    assert!(!order.is_invoice_generated);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(invoice_rows(&fx.state).await.is_empty());
}

#[tokio::test]
async fn generate_unknown_order_is_not_found() {
    let fx = checkout_fixture().await;
    let err = InvoiceService::from_state(&fx.state)
        .generate("nonexistent")
        .await
        .expect_err("must fail");
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn invoice_lookup_by_order() {
    let fx = checkout_fixture().await;
    let (order_key, _) = place_one(&fx, 10, 1).await;

    let repo = InvoiceRepository::new(fx.state.db.clone());
    assert!(repo.find_by_order(&order_key).await.expect("lookup").is_none());

    InvoiceService::from_state(&fx.state)
        .generate(&order_key)
        .await
        .expect("generate");

    let found = repo
        .find_by_order(&order_key)
        .await
        .expect("lookup")
        .expect("invoice exists");
    assert!(found.invoice_number.starts_with("INV-"));
}
