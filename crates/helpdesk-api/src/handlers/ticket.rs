//! Ticket and message thread handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use helpdesk_entity::message::Message;
use helpdesk_entity::ticket::Ticket;
use helpdesk_service::ThreadedMessage;

use crate::dto::request::{
    check, AddParticipantRequest, AddReplyRequest, AssignTicketRequest, CreateTicketRequest,
    UpdatePriorityRequest, UpdateStatusRequest,
};
use crate::dto::response::{ApiResponse, PaginatedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/tickets
pub async fn create_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTicketRequest>,
) -> Result<Json<ApiResponse<Ticket>>, ApiError> {
    check(&req)?;
    let ticket = state
        .ticket_service
        .create_ticket(&auth, req.subject, req.content, req.priority)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// GET /api/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<Ticket>>, ApiError> {
    let page = state
        .ticket_service
        .list_tickets(&auth, &params.into_page_request())
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/tickets/{id}
pub async fn get_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Ticket>>, ApiError> {
    let ticket = state.ticket_service.get_ticket(&auth, id).await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// GET /api/tickets/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ThreadedMessage>>>, ApiError> {
    let thread = state.ticket_service.thread(&auth, id).await?;
    Ok(Json(ApiResponse::ok(thread)))
}

/// POST /api/tickets/{id}/messages
pub async fn add_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddReplyRequest>,
) -> Result<Json<ApiResponse<Message>>, ApiError> {
    let message = state
        .ticket_service
        .add_reply(&auth, id, req.content, req.attachments, req.parent_message_id)
        .await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// PUT /api/tickets/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .ticket_service
        .update_status(&auth, id, req.status)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// PUT /api/tickets/{id}/priority
pub async fn update_priority(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePriorityRequest>,
) -> Result<Json<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .ticket_service
        .update_priority(&auth, id, req.priority)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// PUT /api/tickets/{id}/assign
pub async fn assign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AssignTicketRequest>,
) -> Result<Json<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .ticket_service
        .assign(&auth, id, req.assignee_id)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}

/// POST /api/tickets/{id}/participants
pub async fn add_participant(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<AddParticipantRequest>,
) -> Result<Json<ApiResponse<Ticket>>, ApiError> {
    let ticket = state
        .ticket_service
        .add_participant(&auth, id, req.user_id)
        .await?;
    Ok(Json(ApiResponse::ok(ticket)))
}
