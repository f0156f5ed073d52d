//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use helpdesk_core::error::AppError;
use helpdesk_entity::message::Attachment;
use helpdesk_entity::ticket::{TicketPriority, TicketStatus};
use helpdesk_entity::user::NotificationPreferences;

/// Runs `validator` rules and maps failures onto the domain error type.
pub fn check<T: Validate>(request: &T) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))
}

/// Create ticket request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTicketRequest {
    /// Ticket subject.
    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,
    /// Opening message content.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Initial priority.
    #[serde(default)]
    pub priority: TicketPriority,
}

/// Reply request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReplyRequest {
    /// Message text.
    pub content: Option<String>,
    /// Uploaded attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Parent message id when replying to a specific message.
    pub parent_message_id: Option<Uuid>,
}

/// Status update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status.
    pub status: TicketStatus,
}

/// Priority update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePriorityRequest {
    /// Target priority.
    pub priority: TicketPriority,
}

/// Assignment request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTicketRequest {
    /// Admin the ticket is assigned to.
    pub assignee_id: Uuid,
}

/// Participant request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddParticipantRequest {
    /// User joining the ticket.
    pub user_id: Uuid,
}

/// Preferences update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    /// Replacement preference set.
    pub preferences: NotificationPreferences,
}

/// Create announcement request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    /// Announcement title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Announcement body.
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    /// Explicit recipients; empty means every active user.
    #[serde(default)]
    pub recipient_ids: Vec<Uuid>,
}
