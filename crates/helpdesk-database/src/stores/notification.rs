//! Notification store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_entity::notification::{NewNotification, Notification};

/// Persisted notification inbox per recipient, plus retention operations.
///
/// Every read/write except the retention pair is scoped to a recipient so
/// one user can never touch another's inbox.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Create a notification row.
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification>;

    /// List a recipient's notifications, newest first.
    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<Notification>>;

    /// Count a recipient's unread notifications.
    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Mark one notification read. Returns `false` when no row matched.
    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool>;

    /// Mark all of a recipient's notifications read, returning the count.
    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Delete one notification. Returns `false` when no row matched.
    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool>;

    /// Delete every notification of a recipient, returning the count.
    async fn delete_all_for_recipient(&self, recipient_id: Uuid) -> AppResult<u64>;

    /// Delete notifications created before the cutoff, returning the count.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Keep only the newest `keep` notifications per recipient.
    async fn trim_per_recipient(&self, keep: u32) -> AppResult<u64>;
}
