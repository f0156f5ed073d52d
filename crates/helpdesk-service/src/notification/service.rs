//! Notification delivery service and inbox management.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use helpdesk_core::config::NotificationsConfig;
use helpdesk_core::error::AppError;
use helpdesk_core::result::AppResult;
use helpdesk_core::traits::ChannelTransport;
use helpdesk_core::types::channel::user_channel;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_database::stores::{NotificationStore, UserStore};
use helpdesk_entity::notification::Notification;
use helpdesk_entity::user::NotificationPreferences;

use crate::context::RequestContext;
use crate::directory::UserDirectory;

use super::limiter::RateLimiter;
use super::request::{NotificationRequest, SendReceipt};
use super::retry::{RetryItem, RetryQueue};

/// What one per-recipient delivery attempt produced.
#[derive(Debug)]
pub(crate) enum DeliveryOutcome {
    /// Persisted (and emitted when a subscriber was live).
    Delivered(Box<Notification>),
    /// Dropped by rate limit, resolution, or preference.
    Skipped,
    /// Persistence failed with a network-class error.
    Retriable(AppError),
    /// Persistence failed permanently.
    Permanent(AppError),
}

/// Delivers notifications and manages stored inboxes.
///
/// Delivery runs a per-recipient pipeline: rate limit, directory
/// resolution, preference check, persistence, realtime emission. Each
/// recipient is isolated; one failing never aborts the others, and no
/// failure here ever propagates into the business action that triggered
/// the send.
pub struct NotificationService {
    pub(crate) notifications: Arc<dyn NotificationStore>,
    pub(crate) users: Arc<dyn UserStore>,
    pub(crate) directory: Arc<UserDirectory>,
    pub(crate) transport: Arc<dyn ChannelTransport>,
    pub(crate) limiter: RateLimiter,
    pub(crate) retries: RetryQueue,
    pub(crate) config: NotificationsConfig,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserStore>,
        directory: Arc<UserDirectory>,
        transport: Arc<dyn ChannelTransport>,
        config: NotificationsConfig,
    ) -> Self {
        Self {
            limiter: RateLimiter::new(&config),
            retries: RetryQueue::new(),
            notifications,
            users,
            directory,
            transport,
            config,
        }
    }

    /// Sends a notification to the request's recipients, one at a time.
    ///
    /// Returns `None` when no recipient succeeded, the single stored
    /// notification when exactly one did, and the list when several did.
    /// Invalid requests are logged and produce `None`; they never error.
    pub async fn send(&self, request: NotificationRequest) -> Option<SendReceipt> {
        if let Err(error) = request.validate() {
            warn!(%error, "Rejecting invalid notification request");
            return None;
        }

        let recipients = request.recipients.as_slice().to_vec();
        let mut results = Vec::new();
        for recipient_id in recipients {
            if let Some(stored) = self.deliver_routed(recipient_id, &request).await {
                results.push(stored);
            }
        }
        SendReceipt::from_results(results)
    }

    /// Fans the delivery pipeline out over a recipient list in fixed-size
    /// batches with a short pause between batches.
    ///
    /// Successes are flattened into one list; a failing batch never
    /// aborts the batches after it.
    pub async fn broadcast(&self, request: NotificationRequest) -> Vec<Notification> {
        if let Err(error) = request.validate() {
            warn!(%error, "Rejecting invalid broadcast request");
            return Vec::new();
        }

        let recipients = request.recipients.as_slice().to_vec();
        let batch_size = self.config.broadcast_batch_size.max(1);
        let mut results = Vec::new();
        let mut batches = recipients.chunks(batch_size).peekable();
        while let Some(batch) = batches.next() {
            let outcomes =
                join_all(batch.iter().map(|id| self.deliver_routed(*id, &request))).await;
            results.extend(outcomes.into_iter().flatten());
            if batches.peek().is_some() {
                tokio::time::sleep(self.config.broadcast_batch_pause()).await;
            }
        }
        info!(
            delivered = results.len(),
            requested = recipients.len(),
            kind = %request.kind,
            "Broadcast complete"
        );
        results
    }

    /// Runs the pipeline for one recipient and routes the outcome:
    /// transient persistence failures enter the retry queue, everything
    /// else is logged and dropped.
    async fn deliver_routed(
        &self,
        recipient_id: Uuid,
        request: &NotificationRequest,
    ) -> Option<Notification> {
        match self.deliver(recipient_id, request).await {
            DeliveryOutcome::Delivered(stored) => Some(*stored),
            DeliveryOutcome::Skipped => None,
            DeliveryOutcome::Retriable(error) => {
                warn!(
                    recipient_id = %recipient_id,
                    %error,
                    "Transient failure storing notification, queueing retry"
                );
                self.retries
                    .enqueue(RetryItem::new(request.for_recipient(recipient_id)));
                None
            }
            DeliveryOutcome::Permanent(error) => {
                warn!(
                    recipient_id = %recipient_id,
                    %error,
                    "Dropping notification after non-retriable failure"
                );
                None
            }
        }
    }

    /// The per-recipient pipeline: rate limit, resolve, preference
    /// check, persist, emit. Persistence always precedes emission, and
    /// an emission problem never undoes a persisted notification.
    pub(crate) async fn deliver(
        &self,
        recipient_id: Uuid,
        request: &NotificationRequest,
    ) -> DeliveryOutcome {
        if self.limiter.is_limited(recipient_id) {
            debug!(recipient_id = %recipient_id, "Skipping notification, recipient over rate limit");
            return DeliveryOutcome::Skipped;
        }

        let Some(recipient) = self.directory.resolve(recipient_id).await else {
            debug!(recipient_id = %recipient_id, "Skipping notification, recipient not resolvable");
            return DeliveryOutcome::Skipped;
        };

        if !recipient.preferences.allows(request.kind) {
            debug!(
                recipient_id = %recipient_id,
                kind = %request.kind,
                "Skipping notification, disabled by recipient preference"
            );
            return DeliveryOutcome::Skipped;
        }

        let stored = match self
            .notifications
            .create(&request.to_new_notification(recipient_id))
            .await
        {
            Ok(stored) => stored,
            Err(error) if error.is_retriable() => return DeliveryOutcome::Retriable(error),
            Err(error) => return DeliveryOutcome::Permanent(error),
        };

        self.emit_stored(&stored);
        DeliveryOutcome::Delivered(Box::new(stored))
    }

    /// Emits a stored notification on the recipient's personal channel
    /// under every alias of its kind, when anyone is listening.
    fn emit_stored(&self, stored: &Notification) {
        let channel = user_channel(stored.recipient_id);
        if !self.transport.has_subscribers(&channel) {
            return;
        }
        match serde_json::to_value(stored) {
            Ok(payload) => {
                for event in stored.kind.event_aliases() {
                    let delivered = self.transport.emit(&channel, event, &payload);
                    debug!(channel = %channel, event, delivered, "Emitted notification");
                }
            }
            Err(error) => {
                warn!(notification_id = %stored.id, %error, "Failed to serialize notification payload");
            }
        }
    }

    /// Pops a batch from the retry queue and replays each item through
    /// the full pipeline. Still-transient failures are re-enqueued until
    /// their attempts run out. Returns the number of items processed.
    pub async fn drain_retries(&self) -> usize {
        let batch = self.retries.take_batch(self.config.retry_batch_size);
        if batch.is_empty() {
            return 0;
        }
        let processed = batch.len();
        debug!(count = processed, "Draining notification retry queue");

        for mut item in batch {
            let Some(&recipient_id) = item.request.recipients.as_slice().first() else {
                continue;
            };
            match self.deliver(recipient_id, &item.request).await {
                DeliveryOutcome::Delivered(_) => {
                    debug!(recipient_id = %recipient_id, "Retried notification delivered");
                }
                DeliveryOutcome::Skipped => {}
                DeliveryOutcome::Retriable(error) => {
                    item.attempts += 1;
                    if item.attempts < self.config.retry_max_attempts {
                        self.retries.requeue(item);
                    } else {
                        warn!(
                            recipient_id = %recipient_id,
                            %error,
                            attempts = item.attempts,
                            "Dropping notification after exhausting retries"
                        );
                    }
                }
                DeliveryOutcome::Permanent(error) => {
                    warn!(
                        recipient_id = %recipient_id,
                        %error,
                        "Dropping retried notification after non-retriable failure"
                    );
                }
            }
        }
        processed
    }

    /// Evicts stale directory entries and idle rate-limit windows.
    pub fn sweep_caches(&self) {
        let evicted = self.directory.evict_expired();
        let dropped = self.limiter.sweep();
        debug!(
            directory_evicted = evicted,
            limiter_dropped = dropped,
            "Swept notification caches"
        );
    }

    /// Purges old notifications and trims oversized inboxes.
    pub async fn apply_retention(&self) -> AppResult<()> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(self.config.cleanup_after_days));
        let purged = self.notifications.delete_older_than(cutoff).await?;
        let trimmed = self
            .notifications
            .trim_per_recipient(self.config.max_stored_per_user)
            .await?;
        if purged > 0 || trimmed > 0 {
            info!(purged, trimmed, "Applied notification retention");
        }
        Ok(())
    }

    /// Lists the current user's notifications, newest first.
    pub async fn list_inbox(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<Page<Notification>> {
        self.notifications.list_for_recipient(ctx.user_id, page).await
    }

    /// Counts the current user's unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks one of the current user's notifications read.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        if self
            .notifications
            .mark_read(notification_id, ctx.user_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Marks all of the current user's notifications read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.mark_all_read(ctx.user_id).await
    }

    /// Deletes one of the current user's notifications.
    pub async fn delete(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        if self
            .notifications
            .delete(notification_id, ctx.user_id)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Deletes all of the current user's notifications, returning the count.
    pub async fn delete_all(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notifications.delete_all_for_recipient(ctx.user_id).await
    }

    /// Gets the current user's notification preferences.
    pub async fn get_preferences(
        &self,
        ctx: &RequestContext,
    ) -> AppResult<NotificationPreferences> {
        let user = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(user.notification_preferences)
    }

    /// Replaces the current user's notification preferences and drops
    /// their directory snapshot so the next delivery sees the change.
    pub async fn update_preferences(
        &self,
        ctx: &RequestContext,
        preferences: NotificationPreferences,
    ) -> AppResult<NotificationPreferences> {
        let user = self
            .users
            .update_preferences(ctx.user_id, &preferences)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        self.directory.invalidate(ctx.user_id);
        info!(user_id = %ctx.user_id, "Updated notification preferences");
        Ok(user.notification_preferences)
    }

    /// Current retry queue depth, reported by the detailed health check.
    pub fn retry_depth(&self) -> usize {
        self.retries.len()
    }

    /// Current directory cache size, reported by the detailed health check.
    pub fn directory_entries(&self) -> usize {
        self.directory.len()
    }
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("retry_depth", &self.retries.len())
            .field("directory_entries", &self.directory.len())
            .finish()
    }
}
