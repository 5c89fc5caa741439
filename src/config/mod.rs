//! # ForumWatch Configuration System
//!
//! Typed configuration for the forum monitoring service. Every section has
//! defaults, so an empty configuration directory yields a runnable in-memory
//! deployment.
//!
//! ## Sources (lowest to highest precedence)
//!
//! 1. Built-in defaults
//! 2. `config/forumwatch.toml`
//! 3. `config/forumwatch.<environment>.toml`
//! 4. `FORUMWATCH__<SECTION>__<FIELD>` environment variables
//!
//! ## Usage
//!
//! ```rust,no_run
//! use forumwatch_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let policy = manager.config().rate_limiting.policy();
//! println!("{} requests per {}ms", policy.max_requests, policy.window_ms);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants;
use crate::rate_limit::RateLimitPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring forumwatch.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ForumWatchConfig {
    /// HTTP server settings
    pub web: WebConfig,

    /// Inbound request throttling
    pub rate_limiting: RateLimitingConfig,

    /// Forum health cache and refresh behaviour
    pub health_cache: HealthCacheConfig,

    /// Delegate snapshot history
    pub snapshots: SnapshotConfig,

    /// Durable store for tenants, delegates and snapshots
    pub database: DatabaseConfig,

    /// Outbound email delivery
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind_address: String,
    pub request_timeout_ms: u64,
    pub cors_allowed_origins: Vec<String>,
    /// `s-maxage` advertised on delegate detail responses
    pub delegate_cache_max_age_seconds: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_ms: 30_000,
            cors_allowed_origins: vec!["*".to_string()],
            delegate_cache_max_age_seconds: 300,
        }
    }
}

impl WebConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitingConfig {
    pub enabled: bool,
    pub window_ms: u64,
    pub max_requests: u32,
    pub sweep_interval_seconds: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: constants::rate_limit::DEFAULT_WINDOW_MS,
            max_requests: constants::rate_limit::DEFAULT_MAX_REQUESTS,
            sweep_interval_seconds: constants::rate_limit::SWEEP_INTERVAL.as_secs(),
        }
    }
}

impl RateLimitingConfig {
    pub fn policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(self.window_ms, self.max_requests)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCacheConfig {
    /// Forums refreshed by `POST /cache` and by the scheduled refresh
    pub forum_ids: Vec<String>,

    /// Base URL per forum id, used by the HTTP fetcher
    pub forum_urls: HashMap<String, String>,

    pub fetch_timeout_ms: u64,
    pub max_concurrent_fetches: usize,
    pub degraded_threshold_ms: u64,

    /// Zero disables the scheduled refresh
    pub auto_refresh_interval_seconds: u64,
}

impl Default for HealthCacheConfig {
    fn default() -> Self {
        Self {
            forum_ids: Vec::new(),
            forum_urls: HashMap::new(),
            fetch_timeout_ms: constants::health::DEFAULT_FETCH_TIMEOUT_MS,
            max_concurrent_fetches: constants::health::DEFAULT_MAX_CONCURRENT_FETCHES,
            degraded_threshold_ms: constants::health::DEFAULT_DEGRADED_THRESHOLD_MS,
            auto_refresh_interval_seconds: 0,
        }
    }
}

impl HealthCacheConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn degraded_threshold(&self) -> Duration {
        Duration::from_millis(self.degraded_threshold_ms)
    }

    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        (self.auto_refresh_interval_seconds > 0)
            .then(|| Duration::from_secs(self.auto_refresh_interval_seconds))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub history_limit: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            history_limit: constants::snapshots::DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Absent means tenants, delegates and snapshots live in memory
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from_address: String,
    pub endpoint: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_address: "alerts@forumwatch.local".to_string(),
            endpoint: "https://api.resend.com/emails".to_string(),
        }
    }
}

impl ForumWatchConfig {
    /// Reject values that would make a component unusable
    pub fn validate(&self) -> ConfigResult<()> {
        if self.web.bind_address.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "bind_address",
                "web",
            ));
        }

        if self.rate_limiting.window_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "rate_limiting.window_ms",
                "0",
                "window must be at least one millisecond",
            ));
        }

        if self.rate_limiting.max_requests == 0 {
            return Err(ConfigurationError::invalid_value(
                "rate_limiting.max_requests",
                "0",
                "at least one request per window must be admitted",
            ));
        }

        if self.rate_limiting.sweep_interval_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "rate_limiting.sweep_interval_seconds",
                "0",
                "sweep interval must be positive",
            ));
        }

        if self.health_cache.fetch_timeout_ms == 0 {
            return Err(ConfigurationError::invalid_value(
                "health_cache.fetch_timeout_ms",
                "0",
                "fetch timeout must be positive",
            ));
        }

        if self.health_cache.max_concurrent_fetches == 0 {
            return Err(ConfigurationError::invalid_value(
                "health_cache.max_concurrent_fetches",
                "0",
                "at least one fetch must be allowed in flight",
            ));
        }

        Ok(())
    }
}
