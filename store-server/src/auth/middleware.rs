//! Role middleware
//!
//! 管理接口统一挂 `require_admin`，与 handler 内的业务校验分离。

use axum::{extract::Request, middleware::Next, response::Response};

use crate::utils::AppError;

/// Reject requests whose gateway-injected role is not `admin`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let role = req
        .headers()
        .get("x-user-role")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    if role != "admin" {
        tracing::warn!(uri = %req.uri(), role = %role, "admin route rejected");
        return Err(AppError::Forbidden("admin role required".into()));
    }

    Ok(next.run(req).await)
}
