//! Announcement store contract.

use async_trait::async_trait;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::announcement::{Announcement, NewAnnouncement};

/// Announcement persistence.
#[async_trait]
pub trait AnnouncementStore: Send + Sync + 'static {
    /// Create an announcement.
    async fn create(&self, announcement: &NewAnnouncement) -> AppResult<Announcement>;

    /// Find an announcement by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Announcement>>;

    /// List active announcements, newest first.
    async fn list_active(&self, page: &PageRequest) -> AppResult<Page<Announcement>>;
}
