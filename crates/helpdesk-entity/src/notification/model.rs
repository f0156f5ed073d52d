//! Notification data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::kind::NotificationKind;

/// Optional references a notification can carry alongside its text.
///
/// Flattened into the notification row and its JSON form, so clients see
/// `ticket_id` and friends as top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationMeta {
    pub ticket_id: Option<Uuid>,
    pub announcement_id: Option<Uuid>,
    pub sender_id: Option<Uuid>,
}

impl NotificationMeta {
    pub fn for_ticket(ticket_id: Uuid) -> Self {
        Self {
            ticket_id: Some(ticket_id),
            ..Self::default()
        }
    }

    pub fn for_announcement(announcement_id: Uuid) -> Self {
        Self {
            announcement_id: Some(announcement_id),
            ..Self::default()
        }
    }
}

/// A persisted notification addressed to a single recipient.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: Option<String>,
    pub link: Option<String>,
    pub is_read: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: NotificationMeta,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification row.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: Option<String>,
    pub link: Option<String>,
    pub meta: NotificationMeta,
}
