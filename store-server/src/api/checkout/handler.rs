//! Checkout API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::OrderDetail;
use crate::orders::{CheckoutService, PlaceOrder};
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Checkout request body
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, max = 100))]
    pub cart_id: String,
    #[validate(length(min = 1, max = 100))]
    pub shipping_address_id: String,
    #[validate(length(min = 1, max = 100))]
    pub payment_method_id: String,
    /// External payment proof (mandatory for non cash-on-delivery methods)
    #[validate(length(max = 100))]
    pub transaction_number: Option<String>,
}

/// POST /api/checkout - 购物车结算
///
/// 成功返回完整订单（含订单项）；任何失败都意味着没有任何部分状态
/// 落库——要么拿到订单，要么拿到一个可行动的具体错误。
pub async fn place_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let service = CheckoutService::from_state(&state);
    let detail = service
        .place_order(
            &user,
            PlaceOrder {
                cart_id: payload.cart_id,
                shipping_address_id: payload.shipping_address_id,
                payment_method_id: payload.payment_method_id,
                transaction_number: payload.transaction_number,
            },
        )
        .await
        .map_err(AppError::from)?;

    Ok(ok(detail))
}
