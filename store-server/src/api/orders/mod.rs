//! Order API 模块
//!
//! 顾客侧只读自己的订单；列表、状态更新和手工导入是管理端操作。

mod handler;

use axum::{Router, middleware, routing::{get, patch, post}};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    let customer_routes = Router::new()
        .route("/mine", get(handler::list_mine))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", patch(handler::update))
        .route("/import", post(handler::import))
        .layer(middleware::from_fn(require_admin));

    customer_routes.merge(admin_routes)
}
