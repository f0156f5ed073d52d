//! Database configuration.

use serde::{Deserialize, Serialize};

/// URL value selecting the in-process store backend instead of Postgres.
pub const MEMORY_URL: &str = "memory";

/// Storage backend selection and connection pool sizing.
///
/// The default URL is the [`MEMORY_URL`] sentinel, which runs the whole
/// portal against in-process stores. Point `url` at a PostgreSQL server
/// for durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL, or `memory`.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Minimum number of pooled connections.
    pub min_connections: u32,
    /// Seconds to wait when acquiring a connection.
    pub connect_timeout_seconds: u64,
    /// Seconds an idle connection may linger in the pool.
    pub idle_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Whether the in-process backend is selected.
    pub fn is_memory(&self) -> bool {
        self.url == MEMORY_URL
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: MEMORY_URL.to_string(),
            max_connections: 20,
            min_connections: 5,
            connect_timeout_seconds: 10,
            idle_timeout_seconds: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_memory_backend() {
        let config = DatabaseConfig::default();
        assert!(config.is_memory());
    }

    #[test]
    fn test_postgres_url_is_not_memory() {
        let config = DatabaseConfig {
            url: "postgres://helpdesk@localhost:5432/helpdesk".to_string(),
            ..DatabaseConfig::default()
        };
        assert!(!config.is_memory());
    }
}
