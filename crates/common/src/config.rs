//! Service configuration types.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// TCP port the HTTP server binds on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the SQLite database file (parent directories are created).
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Seconds a cached roster snapshot stays fresh.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// Record a loss for every non-winner after a cookoff.
    /// Off by default: historically only the winner's stats moved.
    #[serde(default)]
    pub record_losses: bool,
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    "data/kitchen.db".into()
}

fn default_ttl_seconds() -> u64 {
    60
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_path: default_database_path(),
            ttl_seconds: default_ttl_seconds(),
            record_losses: false,
        }
    }
}
