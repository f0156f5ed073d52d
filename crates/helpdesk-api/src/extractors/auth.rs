//! `AuthUser` extractor: reads the gateway identity headers and injects context.
//!
//! Authentication itself happens upstream: the API gateway verifies the
//! session and forwards the caller's identity as `x-user-id` and
//! `x-user-role` headers. Requests without both headers are rejected.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use helpdesk_core::error::AppError;
use helpdesk_entity::user::UserRole;
use helpdesk_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the verified user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the verified user role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builds a `RequestContext` from the gateway headers.
///
/// Shared between the HTTP extractor and the WebSocket handshake, which
/// consumes the same headers.
pub fn context_from_headers(headers: &HeaderMap) -> Result<RequestContext, AppError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing x-user-id header"))?;
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::authentication("Invalid x-user-id header"))?;

    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing x-user-role header"))?;
    let role = UserRole::from_str(role)
        .map_err(|_| AppError::authentication("Invalid x-user-role header"))?;

    Ok(RequestContext::new(user_id, role))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = context_from_headers(&parts.headers)?;
        Ok(AuthUser(ctx))
    }
}
