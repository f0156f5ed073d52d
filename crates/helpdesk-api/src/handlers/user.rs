//! User self-service handlers.

use axum::extract::State;
use axum::Json;

use helpdesk_core::error::AppError;
use helpdesk_service::DirectoryUser;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
///
/// Resolved through the directory cache, so the response reflects the same
/// snapshot the notification pipeline sees.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<DirectoryUser>>, ApiError> {
    let user = state
        .directory
        .resolve(auth.user_id)
        .await
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(ApiResponse::ok(user)))
}
