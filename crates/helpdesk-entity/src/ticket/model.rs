//! Ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::priority::TicketPriority;
use super::status::TicketStatus;

/// A support ticket.
///
/// `message_ids` is the ordered list of *top-level* message ids: threaded
/// replies are never appended here and are reachable only through their
/// parent message.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    /// Unique ticket identifier.
    pub id: Uuid,
    /// Short subject line.
    pub subject: String,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Triage priority.
    pub priority: TicketPriority,
    /// The staff member who filed the ticket.
    pub created_by: Uuid,
    /// The admin currently assigned, if any.
    pub assigned_to: Option<Uuid>,
    /// Additional users following the ticket.
    pub participants: Vec<Uuid>,
    /// Ordered ids of the top-level messages.
    pub message_ids: Vec<Uuid>,
    /// When the ticket was created.
    pub created_at: DateTime<Utc>,
    /// When the ticket was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Whether the user is in the participant list.
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    /// Whether the user may view this ticket and post replies.
    pub fn can_view(&self, user_id: Uuid, is_admin: bool) -> bool {
        is_admin
            || self.created_by == user_id
            || self.assigned_to == Some(user_id)
            || self.is_participant(user_id)
    }
}

/// Fields for creating a ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTicket {
    /// Short subject line.
    pub subject: String,
    /// Triage priority.
    pub priority: TicketPriority,
    /// The staff member filing the ticket.
    pub created_by: Uuid,
}
