//! # Health Cache Handlers
//!
//! `GET /cache` reads the forum health cache; `POST /cache` starts a
//! background refresh of the configured forum set and returns at once.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::health::{CacheStats, ForumHealthEntry};
use crate::web::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CacheQuery {
    details: Option<String>,
}

impl CacheQuery {
    fn wants_details(&self) -> bool {
        matches!(self.details.as_deref(), Some("true" | "1" | "yes"))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSummary {
    pub entry_count: usize,
    pub ok_count: usize,
    pub degraded_count: usize,
    pub error_count: usize,
    pub unknown_count: usize,
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_refresh_ago: String,
}

impl CacheSummary {
    fn from_stats(stats: &CacheStats, now: DateTime<Utc>) -> Self {
        Self {
            entry_count: stats.entry_count,
            ok_count: stats.ok_count,
            degraded_count: stats.degraded_count,
            error_count: stats.error_count,
            unknown_count: stats.unknown_count,
            last_refresh: stats.last_refresh,
            last_refresh_ago: stats.last_refresh_ago(now),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CacheStatusResponse {
    pub status: &'static str,
    pub cache: CacheSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forums: Option<BTreeMap<String, ForumHealthEntry>>,
}

#[derive(Debug, Serialize)]
pub struct RefreshStartedResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Cache status: GET /cache[?details=true]
pub async fn get_cache_status(
    State(state): State<AppState>,
    Query(query): Query<CacheQuery>,
) -> Json<CacheStatusResponse> {
    let (stats, entries) = state.health_cache.get_stats_and_health();

    Json(CacheStatusResponse {
        status: "ok",
        cache: CacheSummary::from_stats(&stats, Utc::now()),
        forums: query.wants_details().then_some(entries),
    })
}

/// Trigger a refresh: POST /cache
///
/// Responds before any forum is fetched; the outcome lands in the cache.
pub async fn trigger_refresh(State(state): State<AppState>) -> Json<RefreshStartedResponse> {
    let handle = state
        .health_cache
        .refresh(state.refresh_forum_ids.iter().cloned());

    info!(
        batch_id = %handle.batch_id(),
        forum_count = handle.forum_count(),
        "🔄 Cache refresh started"
    );

    Json(RefreshStartedResponse {
        status: "ok",
        message: "Cache refresh started",
    })
}
