//! Rate limit entry storage.

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request count for one client key inside its current window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitEntry {
    pub key: String,
    pub count: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitEntry {
    /// Open a new window at `now` holding a single request
    pub fn open(key: &str, now: DateTime<Utc>, window: TimeDelta) -> Self {
        Self {
            key: key.to_string(),
            count: 1,
            reset_at: now
                .checked_add_signed(window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// The window closes at `reset_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.reset_at <= now
    }
}

/// Backend holding at most one live entry per key
///
/// `record_hit` is the only mutation path for live entries and must apply the
/// expire-or-increment step atomically per key.
pub trait RateLimitStore: Send + Sync + fmt::Debug {
    /// Count one request for `key`, opening a fresh window when none is live
    fn record_hit(&self, key: &str, window: TimeDelta, now: DateTime<Utc>) -> RateLimitEntry;

    /// Current entry for `key`, expired or not
    fn get(&self, key: &str) -> Option<RateLimitEntry>;

    /// Drop every entry whose window has closed, returning how many were removed
    fn remove_expired(&self, now: DateTime<Utc>) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn backend_name(&self) -> &'static str;
}

/// Process-local store sharded by `DashMap`
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    entries: DashMap<String, RateLimitEntry>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn record_hit(&self, key: &str, window: TimeDelta, now: DateTime<Utc>) -> RateLimitEntry {
        // The entry guard holds the shard write lock for the whole update
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry.is_expired(now) {
                    *entry = RateLimitEntry::open(key, now, window);
                } else {
                    entry.count = entry.count.saturating_add(1);
                }
                entry.clone()
            }
            Entry::Vacant(vacant) => vacant
                .insert(RateLimitEntry::open(key, now, window))
                .value()
                .clone(),
        }
    }

    fn get(&self, key: &str) -> Option<RateLimitEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn remove_expired(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
