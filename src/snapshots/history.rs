//! Derived views over a most-recent-first snapshot window.

use super::models::{RecentPost, Snapshot, SnapshotHistoryPoint, SnapshotTrend};

/// A delegate's snapshot window, newest first
///
/// Built from the output of [`SnapshotStore::latest_snapshots`](super::SnapshotStore)
/// and never re-sorted: the store's ordering is the ordering callers see.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHistory {
    snapshots: Vec<Snapshot>,
}

impl SnapshotHistory {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    /// Head of the window, absent when nothing has been captured yet
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    /// Chart projection without `recentPosts` or `avatarTemplate`
    pub fn points(&self) -> Vec<SnapshotHistoryPoint> {
        self.snapshots.iter().map(SnapshotHistoryPoint::from).collect()
    }

    pub fn recent_posts(&self) -> &[RecentPost] {
        self.latest()
            .map(|snapshot| snapshot.recent_posts.as_slice())
            .unwrap_or_default()
    }

    /// Deltas from the oldest to the newest snapshot in the window
    ///
    /// Deltas saturate at the `i64` bounds.
    pub fn trend(&self) -> Option<SnapshotTrend> {
        if self.snapshots.len() < 2 {
            return None;
        }
        let newest = self.snapshots.first()?;
        let oldest = self.snapshots.last()?;

        Some(SnapshotTrend {
            since: oldest.captured_at,
            until: newest.captured_at,
            post_delta: newest.stats.post_count.saturating_sub(oldest.stats.post_count),
            topic_delta: newest.stats.topic_count.saturating_sub(oldest.stats.topic_count),
            likes_delta: newest
                .stats
                .likes_received
                .saturating_sub(oldest.stats.likes_received),
            days_visited_delta: newest
                .stats
                .days_visited
                .saturating_sub(oldest.stats.days_visited),
            rationale_delta: newest.rationale_count.saturating_sub(oldest.rationale_count),
        })
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn into_latest(self) -> Option<Snapshot> {
        self.snapshots.into_iter().next()
    }
}
