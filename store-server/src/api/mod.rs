//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`checkout`] - 结算接口 (购物车 → 订单)
//! - [`orders`] - 订单查询、管理端状态更新、手工导入
//!
//! 管理端路由统一挂 `auth::require_admin` 中间件；顾客路由通过
//! [`crate::auth::CurrentUser`] extractor 消费网关注入的身份。

pub mod checkout;
pub mod health;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
