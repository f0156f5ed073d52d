//! Announcement publishing.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use helpdesk_core::error::AppError;
use helpdesk_core::result::AppResult;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_database::stores::AnnouncementStore;
use helpdesk_entity::announcement::{Announcement, NewAnnouncement};

use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Publishes announcements and fans them out.
pub struct AnnouncementService {
    announcements: Arc<dyn AnnouncementStore>,
    notifier: Arc<NotificationService>,
}

impl AnnouncementService {
    /// Creates a new announcement service.
    pub fn new(
        announcements: Arc<dyn AnnouncementStore>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self {
            announcements,
            notifier,
        }
    }

    /// Publishes an announcement. Admin only.
    ///
    /// An empty recipient list means every active user. Fan-out runs on
    /// a detached task after the announcement is stored.
    pub async fn publish(
        &self,
        ctx: &RequestContext,
        title: String,
        content: String,
        recipient_ids: Vec<Uuid>,
    ) -> AppResult<Announcement> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only admins may publish announcements",
            ));
        }
        if title.trim().is_empty() {
            return Err(AppError::validation("Title must not be empty"));
        }
        if content.trim().is_empty() {
            return Err(AppError::validation("Content must not be empty"));
        }

        let announcement = self
            .announcements
            .create(&NewAnnouncement {
                title,
                content,
                created_by: ctx.user_id,
                recipient_ids,
            })
            .await?;

        info!(
            announcement_id = %announcement.id,
            user_id = %ctx.user_id,
            targeted = announcement.is_targeted(),
            "Published announcement"
        );

        let notifier = self.notifier.clone();
        let published = announcement.clone();
        tokio::spawn(async move {
            notifier.notify_announcement(&published).await;
        });

        Ok(announcement)
    }

    /// Lists active announcements, newest first.
    pub async fn list_active(&self, page: &PageRequest) -> AppResult<Page<Announcement>> {
        self.announcements.list_active(page).await
    }
}

impl std::fmt::Debug for AnnouncementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnouncementService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use helpdesk_core::config::NotificationsConfig;
    use helpdesk_database::memory::{MemoryAnnouncementStore, MemoryUserStore};
    use helpdesk_entity::user::UserRole;

    use super::*;
    use crate::directory::UserDirectory;
    use crate::test_support::{FlakyNotificationStore, RecordingTransport};

    struct Harness {
        service: AnnouncementService,
        users: Arc<MemoryUserStore>,
        notifications: Arc<FlakyNotificationStore>,
    }

    fn harness() -> Harness {
        let config = NotificationsConfig::default();
        let users = Arc::new(MemoryUserStore::new());
        let announcements = Arc::new(MemoryAnnouncementStore::new());
        let notifications = Arc::new(FlakyNotificationStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let directory = Arc::new(UserDirectory::new(users.clone(), &config));
        let notifier = Arc::new(NotificationService::new(
            notifications.clone(),
            users.clone(),
            directory,
            transport,
            config,
        ));
        Harness {
            service: AnnouncementService::new(announcements, notifier),
            users,
            notifications,
        }
    }

    async fn drain_tasks() {
        for _ in 0..32 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_publish_is_admin_only() {
        let h = harness();
        let staff = h.users.seed("staff", UserRole::Staff);

        let denied = h
            .service
            .publish(
                &RequestContext::new(staff, UserRole::Staff),
                "Downtime".to_string(),
                "Saturday 6am".to_string(),
                Vec::new(),
            )
            .await;
        assert!(denied.is_err());
    }

    #[tokio::test]
    async fn test_publish_requires_title_and_content() {
        let h = harness();
        let admin = h.users.seed("admin", UserRole::Admin);
        let ctx = RequestContext::new(admin, UserRole::Admin);

        let no_title = h
            .service
            .publish(&ctx, " ".to_string(), "body".to_string(), Vec::new())
            .await;
        assert!(no_title.is_err());

        let no_content = h
            .service
            .publish(&ctx, "Title".to_string(), "".to_string(), Vec::new())
            .await;
        assert!(no_content.is_err());
    }

    #[tokio::test]
    async fn test_publish_stores_and_fans_out_to_active_users() {
        let h = harness();
        let admin = h.users.seed("admin", UserRole::Admin);
        let u1 = h.users.seed("u1", UserRole::Staff);
        let u2 = h.users.seed("u2", UserRole::Staff);
        let ctx = RequestContext::new(admin, UserRole::Admin);

        let published = h
            .service
            .publish(
                &ctx,
                "Cafeteria menu".to_string(),
                "Taco day is back".to_string(),
                Vec::new(),
            )
            .await
            .unwrap();
        assert!(!published.is_targeted());

        let listed = h
            .service
            .list_active(&PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listed.total_items, 1);
        assert_eq!(listed.items[0].id, published.id);

        drain_tasks().await;
        let recipients: std::collections::HashSet<Uuid> = h
            .notifications
            .stored()
            .iter()
            .map(|n| n.recipient_id)
            .collect();
        assert_eq!(
            recipients,
            std::collections::HashSet::from([admin, u1, u2])
        );
    }
}
