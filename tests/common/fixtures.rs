//! Scripted collaborators and seeded stores.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use forumwatch_core::config::{RateLimitingConfig, WebConfig};
use forumwatch_core::directory::{Delegate, DirectoryStore, InMemoryDirectory, Tenant};
use forumwatch_core::error::StoreError;
use forumwatch_core::health::{
    FetchError, ForumFetchReport, ForumFetcher, HealthCache, RefreshSettings,
};
use forumwatch_core::rate_limit::RateLimiter;
use forumwatch_core::services::DelegateDetailService;
use forumwatch_core::snapshots::{
    InMemorySnapshotStore, RecentPost, Snapshot, SnapshotStats, SnapshotStore,
};
use forumwatch_core::web::AppState;

pub const TENANT_SLUG: &str = "acme";
pub const FORUM_URL: &str = "https://forum.example";
pub const DELEGATE_USERNAME: &str = "alice";

/// How a scripted forum answers a fetch
#[derive(Debug, Clone)]
pub enum ForumBehaviour {
    Healthy,
    Degraded,
    Fail(&'static str),
    Hang,
}

/// Fetcher answering from a fixed script; unscripted forums fail
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: HashMap<String, ForumBehaviour>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new<'a>(script: impl IntoIterator<Item = (&'a str, ForumBehaviour)>) -> Self {
        Self {
            script: script
                .into_iter()
                .map(|(id, behaviour)| (id.to_string(), behaviour))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForumFetcher for ScriptedFetcher {
    async fn fetch(&self, forum_id: &str) -> Result<ForumFetchReport, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.get(forum_id) {
            Some(ForumBehaviour::Healthy) => Ok(ForumFetchReport::healthy()),
            Some(ForumBehaviour::Degraded) => Ok(ForumFetchReport::degraded()),
            Some(ForumBehaviour::Fail(message)) => Err(FetchError::Unreachable(message.to_string())),
            Some(ForumBehaviour::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(ForumFetchReport::healthy())
            }
            None => Err(FetchError::NotConfigured(forum_id.to_string())),
        }
    }
}

/// Directory that counts how often each lookup runs
#[derive(Debug, Default)]
pub struct CountingDirectory {
    inner: InMemoryDirectory,
    tenant_lookups: AtomicUsize,
    delegate_lookups: AtomicUsize,
}

impl CountingDirectory {
    pub fn inner(&self) -> &InMemoryDirectory {
        &self.inner
    }

    pub fn tenant_lookups(&self) -> usize {
        self.tenant_lookups.load(Ordering::SeqCst)
    }

    pub fn delegate_lookups(&self) -> usize {
        self.delegate_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryStore for CountingDirectory {
    async fn get_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        self.tenant_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_tenant_by_slug(slug).await
    }

    async fn get_delegate_by_username(
        &self,
        tenant_id: Uuid,
        username: &str,
    ) -> Result<Option<Delegate>, StoreError> {
        self.delegate_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_delegate_by_username(tenant_id, username).await
    }
}

/// Snapshot store whose every read fails
#[derive(Debug)]
pub struct BrokenSnapshotStore;

#[async_trait]
impl SnapshotStore for BrokenSnapshotStore {
    async fn latest_snapshots(
        &self,
        _delegate_id: Uuid,
        _limit: u32,
    ) -> Result<Vec<Snapshot>, StoreError> {
        Err(StoreError::Unavailable("snapshot table locked".to_string()))
    }
}

pub fn tenant() -> Tenant {
    Tenant {
        id: Uuid::new_v4(),
        slug: TENANT_SLUG.to_string(),
        name: "Acme DAO".to_string(),
        forum_url: FORUM_URL.to_string(),
    }
}

pub fn delegate(tenant_id: Uuid) -> Delegate {
    Delegate {
        id: Uuid::new_v4(),
        tenant_id,
        username: DELEGATE_USERNAME.to_string(),
        display_name: Some("Alice".to_string()),
        bio: Some("Governance enjoyer".to_string()),
        wallet_address: None,
        created_at: Utc::now() - TimeDelta::days(90),
    }
}

pub fn snapshot(delegate_id: Uuid, captured_at: DateTime<Utc>, post_count: i64) -> Snapshot {
    Snapshot {
        id: Uuid::new_v4(),
        delegate_id,
        captured_at,
        stats: SnapshotStats {
            post_count,
            topic_count: post_count / 4,
            likes_received: post_count * 2,
            days_visited: 30,
            avatar_template: Some("/user_avatar/forum.example/alice/{size}/1.png".to_string()),
        },
        rationale_count: 1,
        recent_posts: vec![RecentPost {
            id: post_count,
            topic_id: 7,
            topic_title: "Budget proposal".to_string(),
            excerpt: None,
            url: Some(format!("{FORUM_URL}/t/7")),
            like_count: 3,
            created_at: captured_at - TimeDelta::hours(1),
        }],
    }
}

/// Directory seeded with one tenant and one delegate
pub fn seeded_directory() -> (Arc<CountingDirectory>, Tenant, Delegate) {
    let directory = Arc::new(CountingDirectory::default());
    let tenant = tenant();
    let delegate = delegate(tenant.id);
    directory.inner().insert_tenant(tenant.clone());
    directory.inner().insert_delegate(delegate.clone());
    (directory, tenant, delegate)
}

/// Snapshot store holding `count` daily snapshots for `delegate_id`
pub fn seeded_snapshots(delegate_id: Uuid, count: usize) -> Arc<InMemorySnapshotStore> {
    let store = Arc::new(InMemorySnapshotStore::new());
    let start = Utc::now() - TimeDelta::days(count as i64);
    for day in 0..count {
        let captured_at = start + TimeDelta::days(day as i64);
        store
            .append(snapshot(delegate_id, captured_at, 10 + day as i64))
            .expect("snapshots are appended in order");
    }
    store
}

pub struct TestStateBuilder {
    directory: Arc<dyn DirectoryStore>,
    snapshots: Arc<dyn SnapshotStore>,
    fetcher: Arc<dyn ForumFetcher>,
    refresh_forum_ids: Vec<String>,
    rate_limiting: RateLimitingConfig,
    fetch_timeout: Duration,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            snapshots: Arc::new(InMemorySnapshotStore::new()),
            fetcher: Arc::new(ScriptedFetcher::default()),
            refresh_forum_ids: Vec::new(),
            rate_limiting: RateLimitingConfig::default(),
            fetch_timeout: Duration::from_secs(5),
        }
    }

    pub fn directory(mut self, directory: Arc<dyn DirectoryStore>) -> Self {
        self.directory = directory;
        self
    }

    pub fn snapshots(mut self, snapshots: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = snapshots;
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn ForumFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn refresh_forums(mut self, forum_ids: &[&str]) -> Self {
        self.refresh_forum_ids = forum_ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn rate_limit(mut self, max_requests: u32, window_ms: u64) -> Self {
        self.rate_limiting.max_requests = max_requests;
        self.rate_limiting.window_ms = window_ms;
        self
    }

    pub fn without_rate_limit(mut self) -> Self {
        self.rate_limiting.enabled = false;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn build(self) -> AppState {
        let health_cache = HealthCache::in_memory(
            self.fetcher,
            RefreshSettings {
                fetch_timeout: self.fetch_timeout,
                max_concurrent_fetches: 4,
            },
        );
        let delegates = DelegateDetailService::new(self.directory, self.snapshots, 30);

        AppState::new(
            WebConfig::default(),
            self.rate_limiting,
            health_cache,
            RateLimiter::in_memory(),
            delegates,
            self.refresh_forum_ids,
        )
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
