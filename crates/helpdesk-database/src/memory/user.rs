//! In-memory user store.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_entity::user::{NotificationPreferences, User, UserRole, UserStatus};

use crate::stores::UserStore;

/// [`UserStore`] backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record.
    pub fn insert(&self, user: User) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(user);
    }

    /// Seed a minimal user with the given role, returning its id.
    pub fn seed(&self, username: &str, role: UserRole) -> Uuid {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@helpdesk.local"),
            role,
            status: UserStatus::Active,
            notification_preferences: NotificationPreferences::default(),
            created_at: now,
            updated_at: now,
        };
        let id = user.id;
        self.insert(user);
        id
    }

    /// Delete a seeded user record.
    pub fn remove(&self, id: Uuid) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|u| u.id != id);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_active_admins(&self) -> AppResult<Vec<User>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let mut admins: Vec<User> = rows
            .iter()
            .filter(|u| u.is_admin() && u.is_active())
            .cloned()
            .collect();
        admins.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(admins)
    }

    async fn find_active(&self) -> AppResult<Vec<User>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let mut users: Vec<User> = rows.iter().filter(|u| u.is_active()).cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NotificationPreferences,
    ) -> AppResult<Option<User>> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.iter_mut().find(|u| u.id == user_id).map(|user| {
            user.notification_preferences = preferences.clone();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}
