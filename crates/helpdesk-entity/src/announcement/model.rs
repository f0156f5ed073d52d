//! Announcement data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A broadcast announcement.
///
/// An empty `recipient_ids` list means the announcement targets every
/// active user at publish time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
    pub recipient_ids: Vec<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    /// Whether the announcement was addressed to an explicit recipient list.
    pub fn is_targeted(&self) -> bool {
        !self.recipient_ids.is_empty()
    }
}

/// Input for publishing an announcement.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
    pub recipient_ids: Vec<Uuid>,
}
