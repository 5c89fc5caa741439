//! # Reference Policy Constants
//!
//! Defaults shared by the rate limiter, the health cache and the HTTP surface.
//! Configuration overrides most of these; the values here are what a fresh
//! deployment runs with.

use std::time::Duration;

/// Rate limiting defaults
pub mod rate_limit {
    use super::Duration;

    /// Window length used when a caller does not supply one
    pub const DEFAULT_WINDOW_MS: u64 = 60_000;

    /// Requests admitted per window when a caller does not supply a limit
    pub const DEFAULT_MAX_REQUESTS: u32 = 30;

    /// Interval between sweeps of expired rate limit entries
    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

    /// Bucket shared by every client without a forwarded or real address
    pub const FALLBACK_CLIENT_KEY: &str = "unknown";
}

/// Health cache defaults
pub mod health {
    /// Per-forum fetch timeout
    pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

    /// Upper bound on concurrent fetches inside one refresh batch
    pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

    /// Successful fetches slower than this are reported as degraded
    pub const DEFAULT_DEGRADED_THRESHOLD_MS: u64 = 3_000;
}

/// Snapshot history defaults
pub mod snapshots {
    /// Number of snapshots returned on the delegate detail endpoint
    pub const DEFAULT_HISTORY_LIMIT: u32 = 30;

    /// Pixel size substituted into avatar templates
    pub const AVATAR_SIZE: u32 = 120;

    /// Placeholder replaced in avatar templates
    pub const AVATAR_SIZE_PLACEHOLDER: &str = "{size}";
}

/// HTTP header names
pub mod headers {
    pub const FORWARDED_FOR: &str = "x-forwarded-for";
    pub const REAL_IP: &str = "x-real-ip";
    pub const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
    pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
    pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";
}

/// Environment variable names
pub mod env {
    pub const ENVIRONMENT: &str = "FORUMWATCH_ENV";
    pub const FALLBACK_ENVIRONMENT: &str = "APP_ENV";
    pub const CONFIG_DIR: &str = "FORUMWATCH_CONFIG_DIR";
    pub const CONFIG_PREFIX: &str = "FORUMWATCH";
}
