//! User store contract.

use async_trait::async_trait;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_entity::user::{NotificationPreferences, User};

/// Read access to user records plus preference updates.
///
/// User provisioning lives upstream in the identity system; this side only
/// consumes accounts and owns their notification preferences.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// List all active users with the admin role.
    async fn find_active_admins(&self) -> AppResult<Vec<User>>;

    /// List all active users.
    async fn find_active(&self) -> AppResult<Vec<User>>;

    /// Replace a user's notification preferences, returning the updated row.
    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NotificationPreferences,
    ) -> AppResult<Option<User>>;
}
