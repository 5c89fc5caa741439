//! # Web API Middleware
//!
//! Request admission (rate limiting) and the shared tower layer stack.

pub mod rate_limit;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::WebConfig;
use crate::web::state::AppState;

/// Apply tracing, CORS and the request timeout to a router
///
/// Layers run outermost first: tracing, CORS, timeout. Timed-out requests
/// answer 408.
pub fn apply_middleware_stack(router: Router<AppState>, web: &WebConfig) -> Router<AppState> {
    router
        .layer(TimeoutLayer::new(web.request_timeout()))
        .layer(create_cors_layer(&web.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}

fn create_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}
