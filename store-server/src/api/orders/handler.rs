//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderDetail, OrderPatch};
use crate::db::repository::{OrderRepository, record_id, record_key};
use crate::orders::{ImportService, ManualOrder, ManualOrderLine, OrderAdminService};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::AddressSnapshot;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/orders - 管理端订单列表 (分页)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .list(query.limit, query.offset)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(ok(orders))
}

/// GET /api/orders/mine - 当前用户的订单
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .list_by_user(record_key("user", &user.id))
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(ok(orders))
}

/// GET /api/orders/:id - 订单详情 (本人或管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.db.clone());
    let detail = repo
        .find_detail(&id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    if !user.is_admin() && detail.order.user != record_id("user", &user.id) {
        return Err(AppError::Forbidden("not your order".into()));
    }

    Ok(ok(detail))
}

/// PATCH /api/orders/:id - 管理端部分更新
///
/// Body 是显式的部分更新结构：status / is_paid / generate_invoice，
/// 未提供的轴保持不变；非法状态值在反序列化时即被拒绝。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let service = OrderAdminService::from_state(&state);
    let detail = service
        .apply_patch(&id, patch)
        .await
        .map_err(AppError::from)?;
    Ok(ok(detail))
}

// =============================================================================
// Manual import
// =============================================================================

/// Imported line with its explicit historical price
#[derive(Debug, Deserialize, Validate)]
pub struct ImportLineRequest {
    #[validate(length(min = 1, max = 100))]
    pub product_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
}

/// Manual order import request body
#[derive(Debug, Deserialize, Validate)]
pub struct ImportOrderRequest {
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(nested)]
    pub lines: Vec<ImportLineRequest>,
    pub shipping: AddressSnapshot,
    #[serde(default)]
    pub transaction_number: Option<String>,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
}

/// POST /api/orders/import - 管理端历史订单补录
pub async fn import(
    State(state): State<ServerState>,
    Json(payload): Json<ImportOrderRequest>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    // The shared snapshot type carries no validator derive
    validate_required_text(&payload.shipping.recipient, "shipping.recipient", MAX_NAME_LEN)?;
    validate_required_text(&payload.shipping.country, "shipping.country", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&payload.shipping.street, "shipping.street", MAX_ADDRESS_LEN)?;
    validate_optional_text(&payload.shipping.city, "shipping.city", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(
        &payload.transaction_number,
        "transaction_number",
        MAX_SHORT_TEXT_LEN,
    )?;

    let service = ImportService::from_state(&state);
    let detail = service
        .import(ManualOrder {
            customer_email: payload.customer_email,
            customer_name: payload.customer_name,
            lines: payload
                .lines
                .into_iter()
                .map(|line| ManualOrderLine {
                    product_id: line.product_id,
                    name: line.name,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    selected_size: line.selected_size,
                    selected_color: line.selected_color,
                })
                .collect(),
            shipping: payload.shipping,
            transaction_number: payload.transaction_number,
            delivery_fee: payload.delivery_fee,
        })
        .await
        .map_err(AppError::from)?;

    Ok(ok(detail))
}
