//! # Web API Module
//!
//! Axum HTTP surface over the health cache and the delegate snapshot
//! history.
//!
//! - `GET /health` - liveness
//! - `GET /cache` - cache stats, `?details=true` adds the per-forum map
//! - `POST /cache` - start a background refresh of the configured forums
//! - `GET /delegates/:tenant_slug/:username` - delegate detail with history
//!
//! Every route except `/health` passes through the rate limiter.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;

pub use errors::{ApiError, ApiResult};
pub use state::AppState;

/// Build the application router with all routes and middleware
pub fn create_app(app_state: AppState) -> Router {
    let limited_routes = routes::api_routes().layer(axum::middleware::from_fn_with_state(
        app_state.clone(),
        middleware::rate_limit::enforce_rate_limit,
    ));

    let router = Router::new()
        .merge(routes::health_routes())
        .merge(limited_routes);

    let web = app_state.web.clone();
    middleware::apply_middleware_stack(router, &web).with_state(app_state)
}
