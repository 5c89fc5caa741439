//! # Service Bootstrap
//!
//! Wires configuration into a running service: stores, the health cache,
//! the rate limiter, owned background loops and the HTTP application state.
//! Without a database URL every store is in-memory.

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{ConfigManager, ForumWatchConfig};
use crate::directory::{DirectoryStore, InMemoryDirectory, PgDirectoryStore};
use crate::error::{ForumWatchError, Result, StoreError};
use crate::health::{HealthCache, HealthRefreshScheduler, HttpForumFetcher, RefreshSettings};
use crate::notifications::EmailClient;
use crate::rate_limit::{RateLimitSweeper, RateLimiter};
use crate::services::DelegateDetailService;
use crate::snapshots::{InMemorySnapshotStore, PgSnapshotStore, SnapshotStore};
use crate::web::AppState;

/// A bootstrapped service and the background loops it owns
#[derive(Debug)]
pub struct ForumWatchService {
    pub app_state: AppState,
    pub email: EmailClient,
    sweeper: Option<RateLimitSweeper>,
    scheduler: Option<HealthRefreshScheduler>,
}

impl ForumWatchService {
    /// Build every component from configuration and start background loops
    ///
    /// Must be called from within a tokio runtime.
    pub async fn bootstrap(manager: &ConfigManager) -> Result<Self> {
        let config = manager.config();
        config.validate()?;

        let (directory, snapshots) = build_stores(config).await?;

        let fetcher = HttpForumFetcher::new(
            config.health_cache.forum_urls.clone(),
            config.health_cache.fetch_timeout(),
            config.health_cache.degraded_threshold(),
        )
        .map_err(|e| ForumWatchError::internal(e.to_string()))?;
        let health_cache = HealthCache::in_memory(
            Arc::new(fetcher),
            RefreshSettings::from_config(&config.health_cache),
        );

        let rate_limiter = RateLimiter::in_memory();
        let sweeper = config.rate_limiting.enabled.then(|| {
            RateLimitSweeper::start(
                rate_limiter.store().clone(),
                config.rate_limiting.sweep_interval(),
            )
        });

        let scheduler = config
            .health_cache
            .auto_refresh_interval()
            .map(|interval| {
                info!(
                    interval_secs = interval.as_secs(),
                    forums = config.health_cache.forum_ids.len(),
                    "⏱️ Scheduled health refresh enabled"
                );
                HealthRefreshScheduler::start(
                    health_cache.clone(),
                    config.health_cache.forum_ids.clone(),
                    interval,
                )
            });

        let delegates =
            DelegateDetailService::new(directory, snapshots, config.snapshots.history_limit);
        let email = EmailClient::from_config(&config.email)?;

        let app_state = AppState::new(
            config.web.clone(),
            config.rate_limiting.clone(),
            health_cache,
            rate_limiter,
            delegates,
            config.health_cache.forum_ids.clone(),
        );

        info!(
            environment = %manager.environment(),
            rate_limiting = config.rate_limiting.enabled,
            refresh_forums = config.health_cache.forum_ids.len(),
            "✅ ForumWatch service bootstrapped"
        );

        Ok(Self {
            app_state,
            email,
            sweeper,
            scheduler,
        })
    }

    pub fn background_loops_running(&self) -> usize {
        let sweeper = self.sweeper.as_ref().is_some_and(RateLimitSweeper::is_running);
        let scheduler = self
            .scheduler
            .as_ref()
            .is_some_and(HealthRefreshScheduler::is_running);
        usize::from(sweeper) + usize::from(scheduler)
    }

    /// Stop owned background loops and wait for them to exit
    pub async fn stop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.shutdown().await;
        }
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown().await;
        }
        info!("🛑 Background loops stopped");
    }
}

async fn build_stores(
    config: &ForumWatchConfig,
) -> Result<(Arc<dyn DirectoryStore>, Arc<dyn SnapshotStore>)> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("No database URL configured, using empty in-memory directory and snapshot stores");
        return Ok((
            Arc::new(InMemoryDirectory::new()),
            Arc::new(InMemorySnapshotStore::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
        .connect(url)
        .await
        .map_err(StoreError::from)?;

    info!(
        max_connections = config.database.max_connections,
        "🗄️ Connected to Postgres"
    );

    Ok((
        Arc::new(PgDirectoryStore::new(pool.clone())),
        Arc::new(PgSnapshotStore::new(pool)),
    ))
}
