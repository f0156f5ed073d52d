//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Reference to an uploaded file attached to a message.
///
/// The file itself lives in the upstream storage service; only the
/// reference is kept here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original file name.
    pub file_name: String,
    /// Download URL in the storage service.
    pub url: String,
}

/// A message on a ticket.
///
/// A message with `parent_message_id` set is a threaded reply to that
/// message; one without is top-level and appears in the ticket's ordered
/// message list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// The ticket this message belongs to.
    pub ticket_id: Uuid,
    /// The author.
    pub sender_id: Uuid,
    /// Body text. May be absent when attachments carry the content.
    pub content: Option<String>,
    /// Attached file references.
    #[sqlx(json)]
    pub attachments: Vec<Attachment>,
    /// Whether the author held the admin role when writing this message.
    pub is_admin_reply: bool,
    /// Parent message when this is a threaded reply.
    pub parent_message_id: Option<Uuid>,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Whether this message is a threaded reply.
    pub fn is_reply(&self) -> bool {
        self.parent_message_id.is_some()
    }
}

/// Fields for creating a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// The ticket this message belongs to.
    pub ticket_id: Uuid,
    /// The author.
    pub sender_id: Uuid,
    /// Body text.
    pub content: Option<String>,
    /// Attached file references.
    pub attachments: Vec<Attachment>,
    /// Whether the author held the admin role.
    pub is_admin_reply: bool,
    /// Parent message when this is a threaded reply.
    pub parent_message_id: Option<Uuid>,
}

impl NewMessage {
    /// A message must carry text or at least one attachment.
    pub fn has_body(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.trim().is_empty())
            || !self.attachments.is_empty()
    }
}
