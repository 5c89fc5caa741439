//! # Web API Route Definitions

use axum::routing::get;
use axum::Router;

use crate::web::handlers;
use crate::web::state::AppState;

/// Rate-limited API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/cache",
            get(handlers::cache::get_cache_status).post(handlers::cache::trigger_refresh),
        )
        .route(
            "/delegates/:tenant_slug/:username",
            get(handlers::delegates::get_delegate_detail),
        )
}

/// Liveness routes, never rate limited
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::basic_health))
}
