//! Shared fakes for service tests: a transport that records emissions
//! and store wrappers that inject failures.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use helpdesk_core::error::AppError;
use helpdesk_core::result::AppResult;
use helpdesk_core::traits::ChannelTransport;
use helpdesk_core::types::{Page, PageRequest};
use helpdesk_database::memory::{MemoryNotificationStore, MemoryUserStore};
use helpdesk_database::stores::{NotificationStore, UserStore};
use helpdesk_entity::notification::{NewNotification, Notification};
use helpdesk_entity::user::{NotificationPreferences, User, UserRole};

/// One recorded emission.
#[derive(Debug, Clone)]
pub struct EmittedEvent {
    pub channel: String,
    pub event: String,
    pub payload: Value,
    pub at: tokio::time::Instant,
}

/// [`ChannelTransport`] that records every emission instead of fanning
/// out to sockets.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    subscribe_everyone: AtomicBool,
    subscribed: Mutex<HashSet<String>>,
    events: Mutex<Vec<EmittedEvent>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a channel as having a live subscriber.
    pub fn subscribe(&self, channel: &str) {
        self.subscribed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.to_string());
    }

    /// Treats every channel as subscribed.
    pub fn subscribe_everyone(&self) {
        self.subscribe_everyone.store(true, Ordering::SeqCst);
    }

    /// All emissions recorded so far, in order.
    pub fn events(&self) -> Vec<EmittedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Emissions recorded for one channel, in order.
    pub fn events_for(&self, channel: &str) -> Vec<EmittedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.channel == channel)
            .collect()
    }
}

impl ChannelTransport for RecordingTransport {
    fn has_subscribers(&self, channel: &str) -> bool {
        self.subscribe_everyone.load(Ordering::SeqCst)
            || self
                .subscribed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(channel)
    }

    fn emit(&self, channel: &str, event: &str, payload: &Value) -> usize {
        if !self.has_subscribers(channel) {
            return 0;
        }
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(EmittedEvent {
                channel: channel.to_string(),
                event: event.to_string(),
                payload: payload.clone(),
                at: tokio::time::Instant::now(),
            });
        1
    }
}

/// [`NotificationStore`] wrapper whose `create` can be made to fail a
/// fixed number of times.
#[derive(Debug, Default)]
pub struct FlakyNotificationStore {
    inner: MemoryNotificationStore,
    failures: Mutex<VecDeque<AppError>>,
    created: Mutex<Vec<Notification>>,
}

impl FlakyNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `times` copies of `error` to be returned by the next
    /// `create` calls.
    pub fn fail_next(&self, times: usize, error: AppError) {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        for _ in 0..times {
            failures.push_back(error.clone());
        }
    }

    /// Number of notifications successfully created.
    pub fn stored_count(&self) -> usize {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Every notification successfully created, in creation order.
    pub fn stored(&self) -> Vec<Notification> {
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationStore for FlakyNotificationStore {
    async fn create(&self, notification: &NewNotification) -> AppResult<Notification> {
        let injected = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        if let Some(error) = injected {
            return Err(error);
        }
        let stored = self.inner.create(notification).await?;
        self.created
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stored.clone());
        Ok(stored)
    }

    async fn list_for_recipient(
        &self,
        recipient_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<Page<Notification>> {
        self.inner.list_for_recipient(recipient_id, page).await
    }

    async fn count_unread(&self, recipient_id: Uuid) -> AppResult<u64> {
        self.inner.count_unread(recipient_id).await
    }

    async fn mark_read(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        self.inner.mark_read(id, recipient_id).await
    }

    async fn mark_all_read(&self, recipient_id: Uuid) -> AppResult<u64> {
        self.inner.mark_all_read(recipient_id).await
    }

    async fn delete(&self, id: Uuid, recipient_id: Uuid) -> AppResult<bool> {
        self.inner.delete(id, recipient_id).await
    }

    async fn delete_all_for_recipient(&self, recipient_id: Uuid) -> AppResult<u64> {
        self.inner.delete_all_for_recipient(recipient_id).await
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.inner.delete_older_than(cutoff).await
    }

    async fn trim_per_recipient(&self, keep: u32) -> AppResult<u64> {
        self.inner.trim_per_recipient(keep).await
    }
}

/// [`UserStore`] wrapper whose `find_by_id` can be made to fail and
/// which counts store fetches.
#[derive(Debug, Default)]
pub struct FlakyUserStore {
    inner: MemoryUserStore,
    failures_left: AtomicUsize,
    fetches: AtomicUsize,
}

impl FlakyUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a minimal user with the given role, returning its id.
    pub fn seed(&self, username: &str, role: UserRole) -> Uuid {
        self.inner.seed(username, role)
    }

    /// Makes the next `times` `find_by_id` calls fail with a network
    /// error.
    pub fn fail_next(&self, times: usize) {
        self.failures_left.store(times, Ordering::SeqCst);
    }

    /// Number of `find_by_id` calls that reached the store.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| {
                left.checked_sub(1)
            })
            .is_ok()
    }
}

#[async_trait]
impl UserStore for FlakyUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.take_failure() {
            return Err(AppError::network("injected directory outage"));
        }
        self.inner.find_by_id(id).await
    }

    async fn find_active_admins(&self) -> AppResult<Vec<User>> {
        self.inner.find_active_admins().await
    }

    async fn find_active(&self) -> AppResult<Vec<User>> {
        self.inner.find_active().await
    }

    async fn update_preferences(
        &self,
        user_id: Uuid,
        preferences: &NotificationPreferences,
    ) -> AppResult<Option<User>> {
        self.inner.update_preferences(user_id, preferences).await
    }
}
