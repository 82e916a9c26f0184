//! CurrentUser Extractor
//!
//! Pulls the gateway-injected identity headers off the request. Handlers
//! that take a [`CurrentUser`] argument reject unauthenticated requests
//! automatically.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;

fn header_str(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let Some(id) = header_str(parts, "x-user-id") else {
            tracing::warn!(uri = %parts.uri, "auth headers missing");
            return Err(AppError::Unauthorized);
        };
        let Some(email) = header_str(parts, "x-user-email") else {
            tracing::warn!(uri = %parts.uri, "auth headers missing email");
            return Err(AppError::Unauthorized);
        };

        let user = CurrentUser {
            id,
            name: header_str(parts, "x-user-name").unwrap_or_else(|| email.clone()),
            email,
            role: header_str(parts, "x-user-role").unwrap_or_else(|| "customer".into()),
        };

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
