//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_entity::user::{NotificationPreferences, User, UserRole, UserStatus};

use super::db_error;
use crate::stores::UserStore;

/// sqlx-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find user by id", e))
    }

    async fn find_active_admins(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 AND status = $2 ORDER BY username",
        )
        .bind(UserRole::Admin)
        .bind(UserStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list active admins", e))
    }

    async fn find_active(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE status = $1 ORDER BY username")
            .bind(UserStatus::Active)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list active users", e))
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NotificationPreferences,
    ) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET notification_preferences = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(sqlx::types::Json(preferences))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update notification preferences", e))
    }
}
