//! Configuration
//!
//! All knobs can be overridden by environment variables:
//!
//! | Environment variable | Default | Meaning |
//! |----------------------|---------|---------|
//! | CALL_COOLDOWN_MS | 30000 | Minimum gap between waiter calls from one session |
//! | FEED_CHANNEL_CAPACITY | 64 | Per-watcher snapshot buffer before a slow consumer is dropped |
//! | LOG_LEVEL | info | Tracing level filter |
//! | LOG_DIR | (unset) | Daily-rolling log file directory |
//! | ENVIRONMENT | development | development \| staging \| production |

use std::time::Duration;

/// Default per-watcher snapshot buffer
pub const DEFAULT_FEED_CHANNEL_CAPACITY: usize = 64;

/// Core configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Waiter-call cooldown window in milliseconds
    pub call_cooldown_ms: u64,
    /// Snapshot buffer per feed watcher; a consumer that falls this far
    /// behind is disconnected rather than queueing without bound
    pub feed_channel_capacity: usize,
    /// Tracing level filter
    pub log_level: String,
    /// Optional log file directory
    pub log_dir: Option<String>,
    /// Running environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            call_cooldown_ms: std::env::var("CALL_COOLDOWN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            feed_channel_capacity: std::env::var("FEED_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&c| c > 0)
                .unwrap_or(DEFAULT_FEED_CHANNEL_CAPACITY),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Waiter-call cooldown window as a [`Duration`]
    pub fn call_cooldown(&self) -> Duration {
        Duration::from_millis(self.call_cooldown_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
