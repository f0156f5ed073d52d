//! Announcement handlers.

use axum::extract::{Query, State};
use axum::Json;

use helpdesk_entity::announcement::Announcement;

use crate::dto::request::{check, CreateAnnouncementRequest};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/announcements
pub async fn create_announcement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAnnouncementRequest>,
) -> Result<Json<ApiResponse<Announcement>>, ApiError> {
    check(&req)?;
    let announcement = state
        .announcement_service
        .publish(&auth, req.title, req.content, req.recipient_ids)
        .await?;
    Ok(Json(ApiResponse::ok(announcement)))
}

/// GET /api/announcements
pub async fn list_announcements(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Announcement>>, ApiError> {
    let page = state
        .announcement_service
        .list_active(&params.into_page_request())
        .await?;
    Ok(Json(page.into()))
}
