//! Real-time WebSocket engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection caps and heartbeat timing for the WebSocket engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// Maximum concurrent connections per user; the oldest is evicted
    /// beyond this.
    pub max_connections_per_user: usize,
    /// Outbound frame buffer size per connection.
    pub channel_buffer_size: usize,
    /// Seconds between server pings.
    pub ping_interval_seconds: u64,
    /// Seconds without a pong before a connection is reaped.
    pub ping_timeout_seconds: u64,
    /// Maximum channel subscriptions per connection.
    pub max_subscriptions_per_connection: usize,
}

impl RealtimeConfig {
    /// Interval between server pings.
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds)
    }

    /// Silence window after which a connection counts as dead.
    pub fn ping_timeout(&self) -> Duration {
        Duration::from_secs(self.ping_timeout_seconds)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_connections_per_user: 5,
            channel_buffer_size: 256,
            ping_interval_seconds: 30,
            ping_timeout_seconds: 90,
            max_subscriptions_per_connection: 50,
        }
    }
}
