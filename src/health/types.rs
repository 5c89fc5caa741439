use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reachability of a monitored forum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Last fetch succeeded
    Ok,
    /// Last fetch succeeded but the forum is slow or partially failing
    Degraded,
    /// Last fetch failed or timed out
    Error,
    /// Never refreshed
    Unknown,
}

impl HealthStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Degraded => "degraded",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known health of one forum
///
/// Entries are only ever replaced as a whole; `last_error` is present only
/// when `status` is `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumHealthEntry {
    pub forum_id: String,
    pub status: HealthStatus,
    pub last_checked_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ForumHealthEntry {
    pub fn reachable(
        forum_id: &str,
        checked_at: DateTime<Utc>,
        degraded: bool,
        response_time_ms: Option<u64>,
    ) -> Self {
        Self {
            forum_id: forum_id.to_string(),
            status: if degraded {
                HealthStatus::Degraded
            } else {
                HealthStatus::Ok
            },
            last_checked_at: checked_at,
            last_error: None,
            response_time_ms,
        }
    }

    pub fn failed(forum_id: &str, checked_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            forum_id: forum_id.to_string(),
            status: HealthStatus::Error,
            last_checked_at: checked_at,
            last_error: Some(error.into()),
            response_time_ms: None,
        }
    }
}

/// Aggregate view computed from the current entries at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub last_refresh: Option<DateTime<Utc>>,
    pub entry_count: usize,
    pub ok_count: usize,
    pub degraded_count: usize,
    pub error_count: usize,
    pub unknown_count: usize,
}

impl CacheStats {
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = &'a ForumHealthEntry>,
        last_refresh: Option<DateTime<Utc>>,
    ) -> Self {
        let mut stats = Self {
            last_refresh,
            ..Self::default()
        };

        for entry in entries {
            stats.entry_count += 1;
            match entry.status {
                HealthStatus::Ok => stats.ok_count += 1,
                HealthStatus::Degraded => stats.degraded_count += 1,
                HealthStatus::Error => stats.error_count += 1,
                HealthStatus::Unknown => stats.unknown_count += 1,
            }
        }

        stats
    }

    /// `"<seconds>s ago"`, or `"never"` before the first completed refresh
    pub fn last_refresh_ago(&self, now: DateTime<Utc>) -> String {
        match self.last_refresh {
            Some(at) => format!("{}s ago", (now - at).num_seconds().max(0)),
            None => "never".to_string(),
        }
    }
}
