//! Notification pipeline configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for the notification delivery pipeline: the user directory
/// cache, the per-recipient rate limiter, the retry queue, batch
/// broadcasting, and stored-notification retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// How long a directory cache entry is served without a store fetch.
    #[serde(default = "default_directory_fresh")]
    pub directory_fresh_seconds: u64,
    /// Age at which the cache sweep evicts a directory entry.
    #[serde(default = "default_directory_max_age")]
    pub directory_max_age_seconds: u64,
    /// Length of one rate-limit window.
    #[serde(default = "default_rate_window")]
    pub rate_limit_window_seconds: u64,
    /// Sends allowed per recipient per window.
    #[serde(default = "default_rate_max")]
    pub rate_limit_max_per_window: u32,
    /// Retry items popped per drain sweep.
    #[serde(default = "default_retry_batch")]
    pub retry_batch_size: usize,
    /// Attempts after which a retry item is dropped.
    #[serde(default = "default_retry_attempts")]
    pub retry_max_attempts: u32,
    /// Recipients per broadcast batch.
    #[serde(default = "default_broadcast_batch")]
    pub broadcast_batch_size: usize,
    /// Pause between broadcast batches in milliseconds.
    #[serde(default = "default_broadcast_pause")]
    pub broadcast_batch_pause_ms: u64,
    /// Number of days after which stored notifications are cleaned up.
    #[serde(default = "default_cleanup_days")]
    pub cleanup_after_days: u32,
    /// Maximum stored notifications per user.
    #[serde(default = "default_max_stored")]
    pub max_stored_per_user: u32,
}

impl NotificationsConfig {
    /// Directory freshness TTL as a [`Duration`].
    pub fn directory_fresh_ttl(&self) -> Duration {
        Duration::from_secs(self.directory_fresh_seconds)
    }

    /// Directory eviction age as a [`Duration`].
    pub fn directory_max_age(&self) -> Duration {
        Duration::from_secs(self.directory_max_age_seconds)
    }

    /// Rate-limit window length as a [`Duration`].
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_seconds)
    }

    /// Pause between broadcast batches as a [`Duration`].
    pub fn broadcast_batch_pause(&self) -> Duration {
        Duration::from_millis(self.broadcast_batch_pause_ms)
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            directory_fresh_seconds: default_directory_fresh(),
            directory_max_age_seconds: default_directory_max_age(),
            rate_limit_window_seconds: default_rate_window(),
            rate_limit_max_per_window: default_rate_max(),
            retry_batch_size: default_retry_batch(),
            retry_max_attempts: default_retry_attempts(),
            broadcast_batch_size: default_broadcast_batch(),
            broadcast_batch_pause_ms: default_broadcast_pause(),
            cleanup_after_days: default_cleanup_days(),
            max_stored_per_user: default_max_stored(),
        }
    }
}

fn default_directory_fresh() -> u64 {
    300
}

fn default_directory_max_age() -> u64 {
    1800
}

fn default_rate_window() -> u64 {
    60
}

fn default_rate_max() -> u32 {
    50
}

fn default_retry_batch() -> usize {
    10
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_broadcast_batch() -> usize {
    50
}

fn default_broadcast_pause() -> u64 {
    100
}

fn default_cleanup_days() -> u32 {
    30
}

fn default_max_stored() -> u32 {
    1000
}
