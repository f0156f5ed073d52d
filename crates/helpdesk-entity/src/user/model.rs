//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::preferences::NotificationPreferences;
use super::role::UserRole;
use super::status::UserStatus;

/// A staff member known to the helpdesk.
///
/// Account provisioning and credentials live upstream; this record is the
/// directory projection the notification layer works from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// User role.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// Per-type notification opt-outs.
    #[sqlx(json)]
    pub notification_preferences: NotificationPreferences,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the account is active.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
