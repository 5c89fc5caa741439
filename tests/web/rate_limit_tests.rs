use forumwatch_core::web::create_app;

use crate::common::fixtures::TestStateBuilder;
use crate::web::{get, get_from, send};

#[tokio::test]
async fn test_requests_over_limit_are_rejected() {
    let app = create_app(TestStateBuilder::new().rate_limit(2, 60_000).build());

    let first = send(&app, get_from("/cache", "203.0.113.7")).await;
    assert_eq!(first.status, 200);
    assert_eq!(first.headers["x-ratelimit-limit"], "2");
    assert_eq!(first.headers["x-ratelimit-remaining"], "1");

    let second = send(&app, get_from("/cache", "203.0.113.7")).await;
    assert_eq!(second.status, 200);
    assert_eq!(second.headers["x-ratelimit-remaining"], "0");

    let third = send(&app, get_from("/cache", "203.0.113.7")).await;
    assert_eq!(third.status, 429);
    assert_eq!(third.body["error"], "Too many requests");
    assert!(third.body["resetAt"].is_string());
    assert_eq!(third.headers["x-ratelimit-remaining"], "0");
    let retry_after: u64 = third.headers["retry-after"]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));
}

#[tokio::test]
async fn test_first_forwarded_hop_is_the_key() {
    let app = create_app(TestStateBuilder::new().rate_limit(1, 60_000).build());

    let first = send(&app, get_from("/cache", "198.51.100.1, 10.0.0.1")).await;
    assert_eq!(first.status, 200);

    // Same client behind a different proxy chain shares the bucket
    let again = send(&app, get_from("/cache", " 198.51.100.1 ,10.9.9.9")).await;
    assert_eq!(again.status, 429);

    let other = send(&app, get_from("/cache", "198.51.100.2")).await;
    assert_eq!(other.status, 200);
}

#[tokio::test]
async fn test_unidentified_clients_share_one_bucket() {
    let app = create_app(TestStateBuilder::new().rate_limit(2, 60_000).build());

    assert_eq!(send(&app, get("/cache")).await.status, 200);
    assert_eq!(send(&app, get("/delegates/acme/alice")).await.status, 404);
    assert_eq!(send(&app, get("/cache")).await.status, 429);
}

#[tokio::test]
async fn test_window_reset_admits_again() {
    let app = create_app(TestStateBuilder::new().rate_limit(1, 100).build());

    assert_eq!(send(&app, get_from("/cache", "192.0.2.1")).await.status, 200);
    assert_eq!(send(&app, get_from("/cache", "192.0.2.1")).await.status, 429);

    tokio::time::sleep(std::time::Duration::from_millis(150)).await;
    assert_eq!(send(&app, get_from("/cache", "192.0.2.1")).await.status, 200);
}

#[tokio::test]
async fn test_disabled_limiter_adds_no_headers() {
    let app = create_app(TestStateBuilder::new().without_rate_limit().build());

    for _ in 0..40 {
        let response = send(&app, get("/cache")).await;
        assert_eq!(response.status, 200);
        assert!(response.headers.get("x-ratelimit-limit").is_none());
    }
}
