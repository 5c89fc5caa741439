use std::sync::Arc;

use forumwatch_core::snapshots::InMemorySnapshotStore;
use forumwatch_core::web::create_app;

use crate::common::fixtures::{
    seeded_directory, seeded_snapshots, BrokenSnapshotStore, TestStateBuilder,
    DELEGATE_USERNAME, FORUM_URL, TENANT_SLUG,
};
use crate::web::{get, send};

#[tokio::test]
async fn test_unknown_tenant_skips_delegate_lookup() {
    let (directory, _, _) = seeded_directory();
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .directory(directory.clone())
        .build();
    let app = create_app(state);

    let response = send(&app, get("/delegates/ghost-dao/alice")).await;
    assert_eq!(response.status, 404);
    assert_eq!(response.body, serde_json::json!({"error": "Tenant not found"}));
    assert_eq!(directory.tenant_lookups(), 1);
    assert_eq!(directory.delegate_lookups(), 0);
}

#[tokio::test]
async fn test_unknown_delegate_is_distinct_404() {
    let (directory, _, _) = seeded_directory();
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .directory(directory.clone())
        .build();
    let app = create_app(state);

    let response = send(&app, get(&format!("/delegates/{TENANT_SLUG}/bob"))).await;
    assert_eq!(response.status, 404);
    assert_eq!(
        response.body,
        serde_json::json!({"error": "Delegate not found"})
    );
    assert_eq!(directory.delegate_lookups(), 1);
}

#[tokio::test]
async fn test_delegate_detail_with_history() {
    let (directory, tenant, delegate) = seeded_directory();
    let snapshots = seeded_snapshots(delegate.id, 5);
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .directory(directory)
        .snapshots(snapshots)
        .build();
    let app = create_app(state);

    let response = send(
        &app,
        get(&format!("/delegates/{TENANT_SLUG}/{DELEGATE_USERNAME}")),
    )
    .await;
    assert_eq!(response.status, 200);
    assert_eq!(
        response.headers["cache-control"],
        "public, s-maxage=300, stale-while-revalidate=600"
    );

    let body = &response.body;
    assert_eq!(body["delegate"]["username"], DELEGATE_USERNAME);
    assert_eq!(
        body["delegate"]["avatarUrl"],
        format!("{FORUM_URL}/user_avatar/forum.example/alice/120/1.png")
    );
    assert_eq!(body["tenant"]["slug"], tenant.slug);
    assert_eq!(body["tenant"]["forumUrl"], FORUM_URL);
    assert_eq!(body["latestSnapshot"]["stats"]["postCount"], 14);

    let history = body["snapshotHistory"].as_array().unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0]["postCount"], 14);
    assert_eq!(history[4]["postCount"], 10);
    assert!(history[0].get("recentPosts").is_none());

    assert_eq!(body["recentPosts"].as_array().unwrap().len(), 1);
    assert_eq!(body["trend"]["postDelta"], 4);
}

#[tokio::test]
async fn test_delegate_without_snapshots() {
    let (directory, _, _) = seeded_directory();
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .directory(directory)
        .snapshots(Arc::new(InMemorySnapshotStore::new()))
        .build();
    let app = create_app(state);

    let response = send(
        &app,
        get(&format!("/delegates/{TENANT_SLUG}/{DELEGATE_USERNAME}")),
    )
    .await;
    assert_eq!(response.status, 200);
    assert!(response.body["latestSnapshot"].is_null());
    assert_eq!(response.body["delegate"]["avatarUrl"], "");
    assert!(response.body["snapshotHistory"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_failure_is_generic_500() {
    let (directory, _, _) = seeded_directory();
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .directory(directory)
        .snapshots(Arc::new(BrokenSnapshotStore))
        .build();
    let app = create_app(state);

    let response = send(
        &app,
        get(&format!("/delegates/{TENANT_SLUG}/{DELEGATE_USERNAME}")),
    )
    .await;
    assert_eq!(response.status, 500);
    assert_eq!(
        response.body,
        serde_json::json!({"error": "Internal server error"})
    );
    assert!(response.headers.get("cache-control").is_none());
}
