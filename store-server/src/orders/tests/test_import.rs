use super::*;
use crate::db::repository::InvoiceRepository;
use crate::orders::{ImportService, ManualOrder, ManualOrderLine, OrderError, UserHandle};
use shared::{AddressSnapshot, OrderStatus};

fn shipping() -> AddressSnapshot {
    AddressSnapshot {
        recipient: "Walk-in Customer".into(),
        phone: None,
        country: "BD".into(),
        city: Some("Chattogram".into()),
        street: "Pier 4".into(),
    }
}

fn manual_order(email: &str, lines: Vec<ManualOrderLine>) -> ManualOrder {
    ManualOrder {
        customer_email: email.into(),
        customer_name: "Walk-in Customer".into(),
        lines,
        shipping: shipping(),
        transaction_number: None,
        delivery_fee: None,
    }
}

fn line(product_id: &str, name: &str, qty: i64, price: rust_decimal::Decimal) -> ManualOrderLine {
    ManualOrderLine {
        product_id: product_id.into(),
        name: name.into(),
        quantity: qty,
        unit_price: price,
        selected_size: None,
        selected_color: None,
    }
}

#[tokio::test]
async fn import_creates_delivered_paid_invoiced_order() {
    let state = test_state().await;
    // A live product exists but must NOT be touched: fulfillment already
    // happened, the availability check is deliberately skipped.
    let pid = seed_product(&state, "Archived Widget", dec(1200, 2), 5).await;

    let service = ImportService::new(state.db.clone(), state.config.clone());
    let detail = service
        .import(manual_order(
            "historic@example.com",
            vec![
                line(&pid, "Archived Widget", 3, dec(900, 2)),
                line("discontinued-1", "Discontinued Thing", 1, dec(50, 2)),
            ],
        ))
        .await
        .expect("import succeeds");

    assert_eq!(detail.order.status, OrderStatus::Delivered);
    assert!(detail.order.is_paid);
    assert!(detail.order.is_invoice_generated);
    assert_eq!(detail.items.len(), 2);
    // Explicit historical prices, not the live catalog price
    let widget = detail
        .items
        .iter()
        .find(|item| item.product_id == pid)
        .expect("widget line");
    assert_eq!(widget.price_paid, dec(900, 2));
    assert_eq!(widget.quantity, 3);
    // 3 * 9.00 + 0.50 + fee 0 = 27.50
    assert_eq!(detail.order.order_total, dec(2750, 2));
    assert!(detail.order.transaction_number.starts_with("MANUAL-"));

    // Invoice row created in the same transaction
    let order_key = detail.order.id.expect("order id").key().to_string();
    let invoice = InvoiceRepository::new(state.db.clone())
        .find_by_order(&order_key)
        .await
        .expect("lookup")
        .expect("invoice exists");
    assert!(invoice.invoice_number.starts_with("INV-"));

    // Stock untouched
    assert_eq!(stock_of(&state, &pid).await, (5, 0));
}

#[tokio::test]
async fn import_is_idempotent_on_customer_email() {
    let state = test_state().await;
    let service = ImportService::new(state.db.clone(), state.config.clone());

    let first = service
        .import(manual_order(
            "repeat@example.com",
            vec![line("p-old", "Old Item", 1, dec(100, 2))],
        ))
        .await
        .expect("first import");
    let second = service
        .import(manual_order(
            "repeat@example.com",
            vec![line("p-old", "Old Item", 2, dec(100, 2))],
        ))
        .await
        .expect("second import");

    // Both orders hang off the same user row
    assert_eq!(first.order.user, second.order.user);

    let users: Vec<crate::db::models::User> = state
        .db
        .query("SELECT * FROM user WHERE email = $email")
        .bind(("email", "repeat@example.com".to_string()))
        .await
        .expect("query users")
        .take(0)
        .expect("decode users");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn find_or_create_reports_created_then_existing() {
    let state = test_state().await;
    let service = ImportService::new(state.db.clone(), state.config.clone());

    let first = service
        .find_or_create_user("new@example.com", "New Person")
        .await
        .expect("first call");
    assert!(matches!(first, UserHandle::Created(_)));

    let second = service
        .find_or_create_user("new@example.com", "New Person")
        .await
        .expect("second call");
    match second {
        UserHandle::Existing(user) => assert_eq!(user.email, "new@example.com"),
        UserHandle::Created(_) => panic!("second call must reuse the row"),
    }
}

#[tokio::test]
async fn import_validates_input() {
    let state = test_state().await;
    let service = ImportService::new(state.db.clone(), state.config.clone());

    let err = service
        .import(manual_order("empty@example.com", vec![]))
        .await
        .expect_err("empty lines rejected");
    assert!(matches!(err, OrderError::Validation(_)));

    let err = service
        .import(manual_order(
            "badqty@example.com",
            vec![line("p1", "Thing", 0, dec(100, 2))],
        ))
        .await
        .expect_err("zero quantity rejected");
    assert!(matches!(err, OrderError::Validation(_)));
}
