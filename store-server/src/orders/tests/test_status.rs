use super::*;
use crate::db::models::OrderPatch;
use crate::orders::{OrderAdminService, OrderError};
use shared::OrderStatus;

/// 下单返回 order_key
async fn place_pending(fx: &Fixture) -> String {
    let pid = seed_product(&fx.state, "Desk Lamp", dec(3500, 2), 10).await;
    fx.add_line(&pid, 1, None, None).await;
    let detail = fx
        .checkout()
        .place_order(&fx.user, fx.place_input(&fx.cod_method, None))
        .await
        .expect("checkout succeeds");
    detail.order.id.expect("order id").key().to_string()
}

#[tokio::test]
async fn status_and_paid_update_in_one_call() {
    let fx = checkout_fixture().await;
    let order_key = place_pending(&fx).await;

    let detail = OrderAdminService::from_state(&fx.state)
        .apply_patch(
            &order_key,
            OrderPatch {
                status: Some(OrderStatus::Processing),
                is_paid: Some(true),
                generate_invoice: None,
            },
        )
        .await
        .expect("patch succeeds");

    assert_eq!(detail.order.status, OrderStatus::Processing);
    assert!(detail.order.is_paid);
}

#[tokio::test]
async fn paid_flag_is_independent_of_status() {
    let fx = checkout_fixture().await;
    let order_key = place_pending(&fx).await;

    let detail = OrderAdminService::from_state(&fx.state)
        .apply_patch(
            &order_key,
            OrderPatch {
                is_paid: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("patch succeeds");

    assert!(detail.order.is_paid);
    assert_eq!(detail.order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn backward_transition_is_rejected() {
    let fx = checkout_fixture().await;
    let order_key = place_pending(&fx).await;
    let service = OrderAdminService::from_state(&fx.state);

    service
        .apply_patch(
            &order_key,
            OrderPatch {
                status: Some(OrderStatus::Shipped),
                ..Default::default()
            },
        )
        .await
        .expect("forward move");

    let err = service
        .apply_patch(
            &order_key,
            OrderPatch {
                status: Some(OrderStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .expect_err("backward move must fail");
    match err {
        OrderError::InvalidTransition { from, to } => {
            assert_eq!(from, OrderStatus::Shipped);
            assert_eq!(to, OrderStatus::Pending);
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }
}

#[tokio::test]
async fn terminal_orders_accept_no_updates() {
    let fx = checkout_fixture().await;
    let order_key = place_pending(&fx).await;
    let service = OrderAdminService::from_state(&fx.state);

    service
        .apply_patch(
            &order_key,
            OrderPatch {
                status: Some(OrderStatus::Cancelled),
                ..Default::default()
            },
        )
        .await
        .expect("cancel");

    let err = service
        .apply_patch(
            &order_key,
            OrderPatch {
                status: Some(OrderStatus::Processing),
                ..Default::default()
            },
        )
        .await
        .expect_err("terminal state is final");
    assert!(matches!(err, OrderError::InvalidTransition { .. }));
}

#[tokio::test]
async fn empty_patch_is_a_validation_error() {
    let fx = checkout_fixture().await;
    let order_key = place_pending(&fx).await;

    let err = OrderAdminService::from_state(&fx.state)
        .apply_patch(&order_key, OrderPatch::default())
        .await
        .expect_err("empty patch rejected");
    assert!(matches!(err, OrderError::Validation(_)));
}

#[tokio::test]
async fn unknown_order_is_not_found() {
    let fx = checkout_fixture().await;
    let err = OrderAdminService::from_state(&fx.state)
        .apply_patch(
            "missing",
            OrderPatch {
                is_paid: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect_err("must fail");
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn generate_invoice_via_patch_forces_processing() {
    let fx = checkout_fixture().await;
    let order_key = place_pending(&fx).await;
    let service = OrderAdminService::from_state(&fx.state);

    let detail = service
        .apply_patch(
            &order_key,
            OrderPatch {
                generate_invoice: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("patch succeeds");
    assert_eq!(detail.order.status, OrderStatus::Processing);
    assert!(detail.order.is_invoice_generated);

    // Idempotent through the PATCH surface as well
    let again = service
        .apply_patch(
            &order_key,
            OrderPatch {
                generate_invoice: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("second patch is a no-op");
    assert_eq!(again.order.status, OrderStatus::Processing);
}
