//! Read-through user cache with a staleness window and a hard age cap.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use helpdesk_core::config::NotificationsConfig;
use helpdesk_database::stores::UserStore;
use helpdesk_entity::user::{NotificationPreferences, User};

/// The slice of a user record the notification pipeline needs.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryUser {
    /// User ID.
    pub id: Uuid,
    /// Display username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Whether the user holds the admin role.
    pub is_admin: bool,
    /// Per-type notification preferences.
    pub preferences: NotificationPreferences,
}

impl From<&User> for DirectoryUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin(),
            preferences: user.notification_preferences.clone(),
        }
    }
}

/// A cached snapshot with its fetch time.
#[derive(Debug, Clone)]
struct CacheEntry {
    user: DirectoryUser,
    fetched_at: Instant,
}

/// Read-through cache over the user store.
///
/// Entries younger than the fresh TTL are served without touching the
/// store. Older entries trigger a fetch; when the store fails, the stale
/// snapshot is served instead so delivery degrades rather than stops.
/// A definitive not-found drops the entry. The background sweep evicts
/// entries older than the hard age cap.
pub struct UserDirectory {
    users: Arc<dyn UserStore>,
    entries: DashMap<Uuid, CacheEntry>,
    fresh_ttl: Duration,
    max_age: Duration,
}

impl UserDirectory {
    /// Creates a directory over the given user store.
    pub fn new(users: Arc<dyn UserStore>, config: &NotificationsConfig) -> Self {
        Self {
            users,
            entries: DashMap::new(),
            fresh_ttl: config.directory_fresh_ttl(),
            max_age: config.directory_max_age(),
        }
    }

    /// Resolves a user snapshot, serving from cache when fresh.
    ///
    /// Never returns an error: a store failure falls back to the cached
    /// snapshot if one exists (however stale) and `None` otherwise.
    pub async fn resolve(&self, user_id: Uuid) -> Option<DirectoryUser> {
        // The guard must not be held across the await below.
        if let Some(entry) = self.entries.get(&user_id) {
            if entry.fetched_at.elapsed() < self.fresh_ttl {
                return Some(entry.user.clone());
            }
        }

        match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => {
                let snapshot = DirectoryUser::from(&user);
                self.entries.insert(
                    user_id,
                    CacheEntry {
                        user: snapshot.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Some(snapshot)
            }
            Ok(None) => {
                self.entries.remove(&user_id);
                None
            }
            Err(error) => {
                warn!(user_id = %user_id, %error, "User lookup failed, serving stale entry if cached");
                self.entries.get(&user_id).map(|entry| entry.user.clone())
            }
        }
    }

    /// Drops the cached snapshot for a user, forcing the next resolve to
    /// hit the store.
    pub fn invalidate(&self, user_id: Uuid) {
        self.entries.remove(&user_id);
    }

    /// Drops every cached snapshot.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Evicts entries older than the hard age cap. Returns the number
    /// evicted.
    pub fn evict_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.fetched_at.elapsed() <= self.max_age);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired directory entries");
        }
        evicted
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory")
            .field("entries", &self.entries.len())
            .field("fresh_ttl", &self.fresh_ttl)
            .field("max_age", &self.max_age)
            .finish()
    }
}
