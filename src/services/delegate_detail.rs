use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::directory::{Delegate, DirectoryStore, TenantSummary};
use crate::error::{ForumWatchError, Result};
use crate::snapshots::{
    resolve_avatar_url, RecentPost, Snapshot, SnapshotHistory, SnapshotHistoryPoint,
    SnapshotStore, SnapshotTrend,
};

/// Delegate profile plus the avatar resolved against its tenant's forum
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateView {
    #[serde(flatten)]
    pub delegate: Delegate,
    pub avatar_url: String,
}

/// Fully assembled delegate-detail payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateDetail {
    pub delegate: DelegateView,
    pub tenant: TenantSummary,
    pub latest_snapshot: Option<Snapshot>,
    pub snapshot_history: Vec<SnapshotHistoryPoint>,
    pub recent_posts: Vec<RecentPost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<SnapshotTrend>,
}

/// Resolves tenant → delegate → snapshot history into a [`DelegateDetail`]
///
/// Lookups run strictly in that order. An unknown tenant short-circuits
/// before any delegate lookup, and any store failure aborts the whole
/// assembly so partial data is never returned.
#[derive(Debug, Clone)]
pub struct DelegateDetailService {
    directory: Arc<dyn DirectoryStore>,
    snapshots: Arc<dyn SnapshotStore>,
    history_limit: u32,
}

impl DelegateDetailService {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        snapshots: Arc<dyn SnapshotStore>,
        history_limit: u32,
    ) -> Self {
        Self {
            directory,
            snapshots,
            history_limit,
        }
    }

    pub fn history_limit(&self) -> u32 {
        self.history_limit
    }

    pub async fn get_delegate_detail(
        &self,
        tenant_slug: &str,
        username: &str,
    ) -> Result<DelegateDetail> {
        let tenant = self
            .directory
            .get_tenant_by_slug(tenant_slug)
            .await
            .map_err(|e| {
                error!(tenant_slug = %tenant_slug, error = %e, "❌ Tenant lookup failed");
                ForumWatchError::from(e)
            })?
            .ok_or_else(ForumWatchError::tenant_not_found)?;

        let delegate = self
            .directory
            .get_delegate_by_username(tenant.id, username)
            .await
            .map_err(|e| {
                error!(tenant_slug = %tenant_slug, username = %username, error = %e, "❌ Delegate lookup failed");
                ForumWatchError::from(e)
            })?
            .ok_or_else(ForumWatchError::delegate_not_found)?;

        let snapshots = self
            .snapshots
            .latest_snapshots(delegate.id, self.history_limit)
            .await
            .map_err(|e| {
                error!(delegate_id = %delegate.id, error = %e, "❌ Snapshot history query failed");
                ForumWatchError::from(e)
            })?;

        let history = SnapshotHistory::new(snapshots);
        debug!(
            tenant_slug = %tenant_slug,
            username = %username,
            snapshots = history.len(),
            "Assembled delegate detail"
        );

        let avatar_url = resolve_avatar_url(
            history
                .latest()
                .and_then(|s| s.stats.avatar_template.as_deref()),
            &tenant.forum_url,
        );
        let snapshot_history = history.points();
        let recent_posts = history.recent_posts().to_vec();
        let trend = history.trend();

        Ok(DelegateDetail {
            delegate: DelegateView {
                delegate,
                avatar_url,
            },
            tenant: TenantSummary::from(&tenant),
            latest_snapshot: history.into_latest(),
            snapshot_history,
            recent_posts,
            trend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{InMemoryDirectory, Tenant};
    use crate::error::{MissingEntity, StoreError};
    use crate::snapshots::{InMemorySnapshotStore, SnapshotStats};
    use async_trait::async_trait;
    use chrono::{TimeDelta, Utc};
    use uuid::Uuid;

    #[derive(Debug)]
    struct FailingSnapshots;

    #[async_trait]
    impl SnapshotStore for FailingSnapshots {
        async fn latest_snapshots(
            &self,
            _delegate_id: Uuid,
            _limit: u32,
        ) -> std::result::Result<Vec<Snapshot>, StoreError> {
            Err(StoreError::Unavailable("connection reset".to_string()))
        }
    }

    fn seeded_directory() -> (Arc<InMemoryDirectory>, Tenant, Delegate) {
        let directory = Arc::new(InMemoryDirectory::new());
        let tenant = Tenant {
            id: Uuid::new_v4(),
            slug: "acme".to_string(),
            name: "Acme DAO".to_string(),
            forum_url: "https://forum.example".to_string(),
        };
        let delegate = Delegate {
            id: Uuid::new_v4(),
            tenant_id: tenant.id,
            username: "alice".to_string(),
            display_name: Some("Alice".to_string()),
            bio: None,
            wallet_address: None,
            created_at: Utc::now(),
        };
        directory.insert_tenant(tenant.clone());
        directory.insert_delegate(delegate.clone());
        (directory, tenant, delegate)
    }

    fn snapshot(delegate_id: Uuid, hours_ago: i64, posts: i64) -> Snapshot {
        Snapshot {
            id: Uuid::new_v4(),
            delegate_id,
            captured_at: Utc::now() - TimeDelta::hours(hours_ago),
            stats: SnapshotStats {
                post_count: posts,
                topic_count: 1,
                likes_received: 2,
                days_visited: 3,
                avatar_template: Some("/user_avatar/{size}.png".to_string()),
            },
            rationale_count: 0,
            recent_posts: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_unknown_tenant() {
        let (directory, _, _) = seeded_directory();
        let service =
            DelegateDetailService::new(directory, Arc::new(InMemorySnapshotStore::new()), 30);

        let err = service.get_delegate_detail("nope", "alice").await.unwrap_err();
        assert!(matches!(
            err,
            ForumWatchError::NotFound(MissingEntity::Tenant)
        ));
    }

    #[tokio::test]
    async fn test_unknown_delegate() {
        let (directory, _, _) = seeded_directory();
        let service =
            DelegateDetailService::new(directory, Arc::new(InMemorySnapshotStore::new()), 30);

        let err = service.get_delegate_detail("acme", "bob").await.unwrap_err();
        assert!(matches!(
            err,
            ForumWatchError::NotFound(MissingEntity::Delegate)
        ));
    }

    #[tokio::test]
    async fn test_detail_without_snapshots() {
        let (directory, tenant, _) = seeded_directory();
        let service =
            DelegateDetailService::new(directory, Arc::new(InMemorySnapshotStore::new()), 30);

        let detail = service.get_delegate_detail("acme", "alice").await.unwrap();
        assert!(detail.latest_snapshot.is_none());
        assert!(detail.snapshot_history.is_empty());
        assert!(detail.trend.is_none());
        assert_eq!(detail.delegate.avatar_url, "");
        assert_eq!(detail.tenant.forum_url, tenant.forum_url);
    }

    #[tokio::test]
    async fn test_detail_uses_latest_snapshot_and_limit() {
        let (directory, _, delegate) = seeded_directory();
        let snapshots = Arc::new(InMemorySnapshotStore::new());
        for (hours_ago, posts) in [(4, 10), (3, 11), (2, 12), (1, 13)] {
            snapshots.append(snapshot(delegate.id, hours_ago, posts)).unwrap();
        }
        let service = DelegateDetailService::new(directory, snapshots, 3);

        let detail = service.get_delegate_detail("acme", "alice").await.unwrap();
        assert_eq!(detail.snapshot_history.len(), 3);
        assert_eq!(detail.latest_snapshot.unwrap().stats.post_count, 13);
        assert_eq!(detail.trend.unwrap().post_delta, 2);
        assert_eq!(
            detail.delegate.avatar_url,
            "https://forum.example/user_avatar/120.png"
        );
    }

    #[tokio::test]
    async fn test_history_failure_is_not_partial() {
        let (directory, _, _) = seeded_directory();
        let service = DelegateDetailService::new(directory, Arc::new(FailingSnapshots), 30);

        let err = service.get_delegate_detail("acme", "alice").await.unwrap_err();
        assert!(matches!(err, ForumWatchError::Storage(_)));
    }

    #[tokio::test]
    async fn test_serialized_shape() {
        let (directory, _, _) = seeded_directory();
        let service =
            DelegateDetailService::new(directory, Arc::new(InMemorySnapshotStore::new()), 30);

        let detail = service.get_delegate_detail("acme", "alice").await.unwrap();
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["delegate"]["username"], "alice");
        assert_eq!(json["delegate"]["avatarUrl"], "");
        assert_eq!(json["tenant"]["slug"], "acme");
        assert!(json["latestSnapshot"].is_null());
        assert!(json["snapshotHistory"].as_array().unwrap().is_empty());
        assert!(json.get("trend").is_none());
    }
}
