//! Fixed-window rate limiter.

use super::store::{InMemoryRateLimitStore, RateLimitStore};
use crate::constants;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Window length and admission limit applied to one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitPolicy {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl RateLimitPolicy {
    pub const fn new(window_ms: u64, max_requests: u32) -> Self {
        Self {
            window_ms,
            max_requests,
        }
    }

    pub fn window(&self) -> TimeDelta {
        TimeDelta::try_milliseconds(i64::try_from(self.window_ms).unwrap_or(i64::MAX))
            .unwrap_or(TimeDelta::MAX)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::new(
            constants::rate_limit::DEFAULT_WINDOW_MS,
            constants::rate_limit::DEFAULT_MAX_REQUESTS,
        )
    }
}

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    pub limit: u32,
}

impl RateLimitDecision {
    /// Seconds until the window closes, rounded up, never below one
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = (self.reset_at - now).num_milliseconds().max(0) as u64;
        millis.div_ceil(1_000).max(1)
    }
}

/// Request admission guard shared by every protected endpoint
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn RateLimitStore> {
        &self.store
    }

    /// Check `key` against `policy` at the current time
    pub fn check(&self, key: &str, policy: RateLimitPolicy) -> RateLimitDecision {
        self.check_at(key, policy, Utc::now())
    }

    /// Check `key` against the reference policy (60s window, 30 requests)
    pub fn check_default(&self, key: &str) -> RateLimitDecision {
        self.check(key, RateLimitPolicy::default())
    }

    /// Check `key` against `policy` as of `now`
    ///
    /// Never fails. The first request of a window is always admitted.
    pub fn check_at(
        &self,
        key: &str,
        policy: RateLimitPolicy,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let entry = self.store.record_hit(key, policy.window(), now);

        let allowed = entry.count == 1 || entry.count <= policy.max_requests;
        let remaining = policy.max_requests.saturating_sub(entry.count);

        debug!(
            client_key = %key,
            count = entry.count,
            limit = policy.max_requests,
            allowed = allowed,
            "Rate limit check"
        );

        RateLimitDecision {
            allowed,
            remaining,
            reset_at: entry.reset_at,
            limit: policy.max_requests,
        }
    }

    /// Prune entries whose window has closed
    pub fn sweep(&self) -> usize {
        self.store.remove_expired(Utc::now())
    }

    pub fn tracked_keys(&self) -> usize {
        self.store.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::in_memory()
    }
}
