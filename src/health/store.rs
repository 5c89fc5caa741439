//! Health entry storage.

use super::types::ForumHealthEntry;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;

/// Consistent copy of every entry plus the cache-wide refresh time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthSnapshot {
    pub entries: BTreeMap<String, ForumHealthEntry>,
    pub last_refresh: Option<DateTime<Utc>>,
}

/// Backend owning the forum health entries
///
/// `replace` is the only write path for entries. Readers receive copies, so
/// nothing observed through `snapshot` can change afterwards.
pub trait HealthStore: Send + Sync + fmt::Debug {
    /// Swap in `entry` for its forum, wholesale
    fn replace(&self, entry: ForumHealthEntry);

    fn get(&self, forum_id: &str) -> Option<ForumHealthEntry>;

    fn snapshot(&self) -> HealthSnapshot;

    /// Record that a batch which started at `batch_started_at` has finished
    fn mark_refreshed(&self, batch_started_at: DateTime<Utc>);

    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Default)]
struct HealthState {
    entries: BTreeMap<String, ForumHealthEntry>,
    last_refresh: Option<DateTime<Utc>>,
}

/// Process-local store behind a single `RwLock`
#[derive(Debug, Default)]
pub struct InMemoryHealthStore {
    state: RwLock<HealthState>,
}

impl InMemoryHealthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HealthStore for InMemoryHealthStore {
    fn replace(&self, entry: ForumHealthEntry) {
        self.state
            .write()
            .entries
            .insert(entry.forum_id.clone(), entry);
    }

    fn get(&self, forum_id: &str) -> Option<ForumHealthEntry> {
        self.state.read().entries.get(forum_id).cloned()
    }

    fn snapshot(&self) -> HealthSnapshot {
        let state = self.state.read();
        HealthSnapshot {
            entries: state.entries.clone(),
            last_refresh: state.last_refresh,
        }
    }

    fn mark_refreshed(&self, batch_started_at: DateTime<Utc>) {
        let mut state = self.state.write();
        // Overlapping batches may finish out of order; keep the newest start
        if state
            .last_refresh
            .map_or(true, |current| batch_started_at > current)
        {
            state.last_refresh = Some(batch_started_at);
        }
    }

    fn backend_name(&self) -> &'static str {
        "in_memory"
    }
}
