//! Postgres-backed snapshot history.

use super::models::{RecentPost, Snapshot, SnapshotStats};
use super::store::SnapshotStore;
use crate::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct SnapshotRow {
    id: Uuid,
    delegate_id: Uuid,
    captured_at: DateTime<Utc>,
    stats: Json<SnapshotStats>,
    rationale_count: i64,
    recent_posts: Json<Vec<RecentPost>>,
}

impl From<SnapshotRow> for Snapshot {
    fn from(row: SnapshotRow) -> Self {
        Self {
            id: row.id,
            delegate_id: row.delegate_id,
            captured_at: row.captured_at,
            stats: row.stats.0,
            rationale_count: row.rationale_count,
            recent_posts: row.recent_posts.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgSnapshotStore {
    pool: PgPool,
}

impl PgSnapshotStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for PgSnapshotStore {
    async fn latest_snapshots(
        &self,
        delegate_id: Uuid,
        limit: u32,
    ) -> Result<Vec<Snapshot>, StoreError> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT id, delegate_id, captured_at, stats, rationale_count, recent_posts
            FROM delegate_snapshots
            WHERE delegate_id = $1
            ORDER BY captured_at DESC
            LIMIT $2
            "#,
        )
        .bind(delegate_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Snapshot::from).collect())
    }
}
