//! In-memory announcement store.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::announcement::{Announcement, NewAnnouncement};

use super::paginate;
use crate::stores::AnnouncementStore;

/// [`AnnouncementStore`] backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryAnnouncementStore {
    rows: RwLock<Vec<Announcement>>,
}

impl MemoryAnnouncementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnnouncementStore for MemoryAnnouncementStore {
    async fn create(&self, announcement: &NewAnnouncement) -> AppResult<Announcement> {
        let row = Announcement {
            id: Uuid::new_v4(),
            title: announcement.title.clone(),
            content: announcement.content.clone(),
            created_by: announcement.created_by,
            recipient_ids: announcement.recipient_ids.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Announcement>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows.iter().find(|a| a.id == id).cloned())
    }

    async fn list_active(&self, page: &PageRequest) -> AppResult<Page<Announcement>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let announcements: Vec<Announcement> =
            rows.iter().rev().filter(|a| a.is_active).cloned().collect();
        Ok(paginate(announcements, page))
    }
}
