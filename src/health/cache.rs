//! Health cache with fire-and-forget background refresh.

use super::fetcher::{FetchError, ForumFetcher};
use super::store::{HealthStore, InMemoryHealthStore};
use super::types::{CacheStats, ForumHealthEntry, HealthStatus};
use crate::config::HealthCacheConfig;
use crate::error::ForumWatchError;
use crate::logging::log_forum_refresh;
use chrono::{DateTime, Utc};
use futures::{FutureExt, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Limits applied to every refresh batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSettings {
    pub fetch_timeout: Duration,
    pub max_concurrent_fetches: usize,
}

impl RefreshSettings {
    pub fn from_config(config: &HealthCacheConfig) -> Self {
        Self {
            fetch_timeout: config.fetch_timeout(),
            max_concurrent_fetches: config.max_concurrent_fetches,
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self::from_config(&HealthCacheConfig::default())
    }
}

/// Counts for one finished batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSummary {
    pub batch_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub ok: usize,
    pub degraded: usize,
    pub failed: usize,
}

impl RefreshSummary {
    pub fn total(&self) -> usize {
        self.ok + self.degraded + self.failed
    }
}

/// A refresh batch running in the background
///
/// Dropping the handle detaches the batch; it keeps running and still
/// updates the cache. Awaiting `wait` is only needed to observe completion.
#[derive(Debug)]
pub struct RefreshHandle {
    batch_id: Uuid,
    forum_count: usize,
    handle: JoinHandle<RefreshSummary>,
}

impl RefreshHandle {
    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    pub fn forum_count(&self) -> usize {
        self.forum_count
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the batch; `None` if the background task was aborted
    pub async fn wait(self) -> Option<RefreshSummary> {
        match self.handle.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(batch_id = %self.batch_id, error = %e, "Refresh batch did not complete");
                None
            }
        }
    }
}

/// Best-effort view of forum reachability
///
/// Reads are synchronous copies of the store. `refresh` never blocks on
/// network I/O and never reports fetch failures to its caller; they are
/// captured into each forum's entry instead.
#[derive(Debug, Clone)]
pub struct HealthCache {
    store: Arc<dyn HealthStore>,
    fetcher: Arc<dyn ForumFetcher>,
    settings: RefreshSettings,
}

impl HealthCache {
    pub fn new(
        store: Arc<dyn HealthStore>,
        fetcher: Arc<dyn ForumFetcher>,
        settings: RefreshSettings,
    ) -> Self {
        info!(
            backend = store.backend_name(),
            fetch_timeout_ms = settings.fetch_timeout.as_millis() as u64,
            max_concurrent_fetches = settings.max_concurrent_fetches,
            "🩺 Health cache initialized"
        );
        Self {
            store,
            fetcher,
            settings,
        }
    }

    pub fn in_memory(fetcher: Arc<dyn ForumFetcher>, settings: RefreshSettings) -> Self {
        Self::new(Arc::new(InMemoryHealthStore::new()), fetcher, settings)
    }

    pub fn settings(&self) -> RefreshSettings {
        self.settings
    }

    /// Aggregate counts and last refresh time; zero/absent before any refresh
    pub fn get_stats(&self) -> CacheStats {
        let snapshot = self.store.snapshot();
        CacheStats::from_entries(snapshot.entries.values(), snapshot.last_refresh)
    }

    /// Copy of every current entry keyed by forum id
    pub fn get_health(&self) -> BTreeMap<String, ForumHealthEntry> {
        self.store.snapshot().entries
    }

    /// Stats and entries read under one consistent view
    pub fn get_stats_and_health(&self) -> (CacheStats, BTreeMap<String, ForumHealthEntry>) {
        let snapshot = self.store.snapshot();
        let stats = CacheStats::from_entries(snapshot.entries.values(), snapshot.last_refresh);
        (stats, snapshot.entries)
    }

    /// Status of one forum, `Unknown` if it has never been refreshed
    pub fn status_of(&self, forum_id: &str) -> HealthStatus {
        self.store
            .get(forum_id)
            .map_or(HealthStatus::Unknown, |entry| entry.status)
    }

    /// Start refreshing `forum_ids` in the background and return immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn refresh<I, S>(&self, forum_ids: I) -> RefreshHandle
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let forum_ids: BTreeSet<String> = forum_ids.into_iter().map(Into::into).collect();
        let batch_id = Uuid::new_v4();
        let forum_count = forum_ids.len();

        debug!(
            batch_id = %batch_id,
            forum_count = forum_count,
            "Spawning health refresh batch"
        );

        let cache = self.clone();
        let handle = tokio::spawn(async move { cache.run_batch(batch_id, forum_ids).await });

        RefreshHandle {
            batch_id,
            forum_count,
            handle,
        }
    }

    async fn run_batch(&self, batch_id: Uuid, forum_ids: BTreeSet<String>) -> RefreshSummary {
        let started_at = Utc::now();
        let concurrency = self.settings.max_concurrent_fetches.max(1);

        let this = self;
        let statuses: Vec<HealthStatus> = futures::stream::iter(forum_ids)
            .map(move |forum_id| async move { this.refresh_forum(&forum_id).await })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        self.store.mark_refreshed(started_at);

        let summary = RefreshSummary {
            batch_id,
            started_at,
            completed_at: Utc::now(),
            ok: count_status(&statuses, HealthStatus::Ok),
            degraded: count_status(&statuses, HealthStatus::Degraded),
            failed: count_status(&statuses, HealthStatus::Error),
        };

        info!(
            batch_id = %batch_id,
            forums = summary.total(),
            ok = summary.ok,
            degraded = summary.degraded,
            failed = summary.failed,
            duration_ms = (summary.completed_at - started_at).num_milliseconds(),
            "✅ Health refresh batch completed"
        );

        summary
    }

    /// Fetch one forum and replace its entry with the outcome
    async fn refresh_forum(&self, forum_id: &str) -> HealthStatus {
        let started = Instant::now();
        let timeout = self.settings.fetch_timeout;

        let outcome = AssertUnwindSafe(tokio::time::timeout(
            timeout,
            self.fetcher.fetch(forum_id),
        ))
        .catch_unwind()
        .await;

        let failure = |message: String| ForumWatchError::UpstreamFetch {
            forum_id: forum_id.to_string(),
            message,
        };

        let checked_at = Utc::now();
        let entry = match outcome {
            Ok(Ok(Ok(report))) => ForumHealthEntry::reachable(
                forum_id,
                checked_at,
                report.degraded,
                report
                    .response_time_ms
                    .or(Some(started.elapsed().as_millis() as u64)),
            ),
            Ok(Ok(Err(fetch_error))) => {
                record_failure(forum_id, checked_at, failure(fetch_error.to_string()))
            }
            Ok(Err(_elapsed)) => {
                let timeout_error = FetchError::Timeout {
                    timeout_ms: timeout.as_millis() as u64,
                };
                record_failure(forum_id, checked_at, failure(timeout_error.to_string()))
            }
            Err(_panic) => record_failure(
                forum_id,
                checked_at,
                failure("fetch aborted unexpectedly".to_string()),
            ),
        };

        let status = entry.status;
        log_forum_refresh(
            forum_id,
            status.as_str(),
            started.elapsed().as_millis() as u64,
            entry.last_error.as_deref(),
        );
        self.store.replace(entry);
        status
    }
}

fn record_failure(
    forum_id: &str,
    checked_at: DateTime<Utc>,
    error: ForumWatchError,
) -> ForumHealthEntry {
    warn!(forum_id = %forum_id, error = %error, "Forum refresh failed");
    let message = match error {
        ForumWatchError::UpstreamFetch { message, .. } => message,
        other => other.to_string(),
    };
    ForumHealthEntry::failed(forum_id, checked_at, message)
}

fn count_status(statuses: &[HealthStatus], wanted: HealthStatus) -> usize {
    statuses.iter().filter(|status| **status == wanted).count()
}
