use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Point-in-time forum statistics for one delegate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStats {
    pub post_count: i64,
    pub topic_count: i64,
    pub likes_received: i64,
    pub days_visited: i64,
    pub avatar_template: Option<String>,
}

/// Summary of a post as observed at capture time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentPost {
    pub id: i64,
    pub topic_id: i64,
    pub topic_title: String,
    pub excerpt: Option<String>,
    pub url: Option<String>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Immutable capture of a delegate's activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: Uuid,
    pub delegate_id: Uuid,
    pub captured_at: DateTime<Utc>,
    pub stats: SnapshotStats,
    pub rationale_count: i64,
    pub recent_posts: Vec<RecentPost>,
}

/// Lightweight projection used for history charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotHistoryPoint {
    pub captured_at: DateTime<Utc>,
    pub post_count: i64,
    pub topic_count: i64,
    pub likes_received: i64,
    pub days_visited: i64,
    pub rationale_count: i64,
}

impl From<&Snapshot> for SnapshotHistoryPoint {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            captured_at: snapshot.captured_at,
            post_count: snapshot.stats.post_count,
            topic_count: snapshot.stats.topic_count,
            likes_received: snapshot.stats.likes_received,
            days_visited: snapshot.stats.days_visited,
            rationale_count: snapshot.rationale_count,
        }
    }
}

/// Change between the oldest and newest snapshot of a history window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTrend {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub post_delta: i64,
    pub topic_delta: i64,
    pub likes_delta: i64,
    pub days_visited_delta: i64,
    pub rationale_delta: i64,
}
