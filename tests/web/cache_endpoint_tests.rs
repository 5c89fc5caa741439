use std::sync::Arc;
use std::time::Duration;

use forumwatch_core::web::create_app;

use crate::common::fixtures::{ForumBehaviour, ScriptedFetcher, TestStateBuilder};
use crate::web::{get, post, send, TestResponse};

async fn wait_for_refresh(app: &axum::Router) -> TestResponse {
    for _ in 0..100 {
        let response = send(app, get("/cache?details=true")).await;
        if !response.body["cache"]["lastRefresh"].is_null() {
            return response;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("refresh never completed");
}

#[tokio::test]
async fn test_cache_status_before_any_refresh() {
    let app = create_app(TestStateBuilder::new().without_rate_limit().build());

    let response = send(&app, get("/cache")).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["cache"]["entryCount"], 0);
    assert_eq!(response.body["cache"]["okCount"], 0);
    assert_eq!(response.body["cache"]["errorCount"], 0);
    assert_eq!(response.body["cache"]["lastRefreshAgo"], "never");
    assert!(response.body.get("forums").is_none());
}

#[tokio::test]
async fn test_refresh_returns_before_fetches_finish() {
    let fetcher = Arc::new(ScriptedFetcher::new([("slow", ForumBehaviour::Hang)]));
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .fetcher(fetcher)
        .fetch_timeout(Duration::from_secs(30))
        .refresh_forums(&["slow"])
        .build();
    let app = create_app(state);

    let response = tokio::time::timeout(Duration::from_secs(2), send(&app, post("/cache")))
        .await
        .expect("POST /cache must not wait on the refresh");

    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        serde_json::json!({"status": "ok", "message": "Cache refresh started"})
    );

    let status = send(&app, get("/cache")).await;
    assert_eq!(status.body["cache"]["lastRefreshAgo"], "never");
}

#[tokio::test]
async fn test_refresh_records_success_and_failure() {
    let fetcher = Arc::new(ScriptedFetcher::new([
        ("a", ForumBehaviour::Healthy),
        ("b", ForumBehaviour::Fail("connection refused")),
    ]));
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .fetcher(fetcher.clone())
        .refresh_forums(&["a", "b"])
        .build();
    let app = create_app(state);

    send(&app, post("/cache")).await;
    let response = wait_for_refresh(&app).await;

    let cache = &response.body["cache"];
    assert_eq!(cache["entryCount"], 2);
    assert_eq!(cache["okCount"], 1);
    assert_eq!(cache["errorCount"], 1);
    assert!(cache["lastRefreshAgo"].as_str().unwrap().ends_with("s ago"));

    let forums = &response.body["forums"];
    assert_eq!(forums["a"]["status"], "ok");
    assert!(forums["a"].get("lastError").map_or(true, |e| e.is_null()));
    assert_eq!(forums["b"]["status"], "error");
    assert!(forums["b"]["lastError"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_timed_out_forum_does_not_block_batch() {
    let fetcher = Arc::new(ScriptedFetcher::new([
        ("fast", ForumBehaviour::Degraded),
        ("stuck", ForumBehaviour::Hang),
    ]));
    let state = TestStateBuilder::new()
        .without_rate_limit()
        .fetcher(fetcher)
        .fetch_timeout(Duration::from_millis(100))
        .refresh_forums(&["fast", "stuck"])
        .build();
    let app = create_app(state);

    send(&app, post("/cache")).await;
    let response = wait_for_refresh(&app).await;

    assert_eq!(response.body["forums"]["fast"]["status"], "degraded");
    assert_eq!(response.body["forums"]["stuck"]["status"], "error");
    assert_eq!(response.body["cache"]["degradedCount"], 1);
}

#[tokio::test]
async fn test_empty_refresh_set_still_stamps_last_refresh() {
    let app = create_app(TestStateBuilder::new().without_rate_limit().build());

    send(&app, post("/cache")).await;
    let response = wait_for_refresh(&app).await;
    assert_eq!(response.body["cache"]["entryCount"], 0);
    assert!(response.body["forums"].as_object().unwrap().is_empty());
}
