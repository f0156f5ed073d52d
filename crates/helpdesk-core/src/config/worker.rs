//! Background sweep scheduling configuration.

use serde::{Deserialize, Serialize};

/// Schedules for the periodic maintenance sweeps.
///
/// Cron expressions use the 6-field form with seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the maintenance scheduler runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Retry queue drain schedule (every 30 seconds).
    #[serde(default = "default_retry_drain_schedule")]
    pub retry_drain_schedule: String,
    /// Directory cache and limiter sweep schedule (every 10 minutes).
    #[serde(default = "default_cache_sweep_schedule")]
    pub cache_sweep_schedule: String,
    /// Stored-notification retention schedule (daily).
    #[serde(default = "default_retention_schedule")]
    pub retention_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            retry_drain_schedule: default_retry_drain_schedule(),
            cache_sweep_schedule: default_cache_sweep_schedule(),
            retention_schedule: default_retention_schedule(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_retry_drain_schedule() -> String {
    "*/30 * * * * *".to_string()
}

fn default_cache_sweep_schedule() -> String {
    "0 */10 * * * *".to_string()
}

fn default_retention_schedule() -> String {
    "0 0 3 * * *".to_string()
}
