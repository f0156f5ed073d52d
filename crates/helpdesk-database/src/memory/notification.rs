//! In-memory notification store.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::notification::{NewNotification, Notification};

use super::paginate;
use crate::stores::NotificationStore;

/// [`NotificationStore`] backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: RwLock<Vec<Notification>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            recipient_id: notification.recipient_id,
            kind: notification.kind,
            title: notification.title.clone(),
            message: notification.message.clone(),
            link: notification.link.clone(),
            is_read: false,
            meta: notification.meta.clone(),
            created_at: Utc::now(),
        };
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row.clone());
        Ok(row)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<Notification>> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        let notifications: Vec<Notification> = rows
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        Ok(paginate(notifications, page))
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        Ok(rows
            .iter()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        match rows
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = 0;
        for notification in rows
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|n| !(n.id == id && n.recipient_id == recipient_id));
        Ok(rows.len() < before)
    }

    async fn delete_all_for_recipient(&self, recipient_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|n| n.recipient_id != recipient_id);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();
        rows.retain(|n| n.created_at >= cutoff);
        Ok((before - rows.len()) as u64)
    }

    async fn trim_per_recipient(&self, keep: u32) -> AppResult<u64> {
        let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
        let before = rows.len();

        // Walk newest-first so the cap keeps the most recent rows.
        let mut kept: HashMap<Uuid, u32> = HashMap::new();
        let mut keep_flags = vec![false; rows.len()];
        for (idx, notification) in rows.iter().enumerate().rev() {
            let count = kept.entry(notification.recipient_id).or_insert(0);
            if *count < keep {
                *count += 1;
                keep_flags[idx] = true;
            }
        }
        let mut idx = 0;
        rows.retain(|_| {
            let keep_row = keep_flags[idx];
            idx += 1;
            keep_row
        });

        Ok((before - rows.len()) as u64)
    }
}
