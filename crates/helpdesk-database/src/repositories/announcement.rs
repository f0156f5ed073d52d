//! Announcement repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::announcement::{Announcement, NewAnnouncement};

use super::db_error;
use crate::stores::AnnouncementStore;

/// sqlx-backed [`AnnouncementStore`].
#[derive(Debug, Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    /// Create a new announcement repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementStore for AnnouncementRepository {
    async fn create(&self, announcement: &NewAnnouncement) -> AppResult<Announcement> {
        sqlx::query_as::<_, Announcement>(
            "INSERT INTO announcements (title, content, created_by, recipient_ids) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&announcement.title)
        .bind(&announcement.content)
        .bind(announcement.created_by)
        .bind(&announcement.recipient_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create announcement", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Announcement>> {
        sqlx::query_as::<_, Announcement>("SELECT * FROM announcements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find announcement by id", e))
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<Page<Announcement>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM announcements WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count announcements", e))?;

        let announcements = sqlx::query_as::<_, Announcement>(
            "SELECT * FROM announcements WHERE is_active = TRUE \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list announcements", e))?;

        Ok(Page::new(announcements, page, total as u64))
    }
}
