//! Fixed-window per-recipient rate limiter.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use helpdesk_core::config::NotificationsConfig;

/// One recipient's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Caps how many notifications a single recipient can receive per window.
///
/// The counter state lives only in memory; a restart resets all windows.
/// The limiter fails open: an over-the-cap recipient is skipped, never
/// errored.
#[derive(Debug)]
pub struct RateLimiter {
    windows: Mutex<HashMap<Uuid, Window>>,
    window: Duration,
    max_per_window: u32,
}

impl RateLimiter {
    /// Creates a limiter from the notification settings.
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window: config.rate_limit_window(),
            max_per_window: config.rate_limit_max_per_window,
        }
    }

    /// Counts one delivery attempt against the recipient's window and
    /// reports whether it pushed them over the cap.
    ///
    /// The check and the increment happen inside one critical section,
    /// so concurrent senders cannot both observe the same slot free.
    pub fn is_limited(&self, recipient_id: Uuid) -> bool {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let window = windows.entry(recipient_id).or_insert(Window {
            started_at: now,
            count: 0,
        });
        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }
        window.count += 1;
        let limited = window.count > self.max_per_window;
        if limited {
            debug!(recipient_id = %recipient_id, count = window.count, "Recipient over notification rate limit");
        }
        limited
    }

    /// Drops windows that have been idle for a full window length.
    /// Returns the number removed.
    pub fn sweep(&self) -> usize {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = windows.len();
        let window = self.window;
        windows.retain(|_, w| w.started_at.elapsed() < window);
        before - windows.len()
    }

    /// Number of recipients with a tracked window.
    pub fn tracked(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
