//! # Web API Application State
//!
//! Shared state handed to every handler: the health cache, the rate limiter,
//! the delegate detail service and the slices of configuration the HTTP
//! layer reads on each request.

use std::sync::Arc;

use crate::config::{RateLimitingConfig, WebConfig};
use crate::health::HealthCache;
use crate::rate_limit::RateLimiter;
use crate::services::DelegateDetailService;

#[derive(Debug, Clone)]
pub struct AppState {
    pub web: Arc<WebConfig>,
    pub rate_limiting: Arc<RateLimitingConfig>,
    pub health_cache: HealthCache,
    pub rate_limiter: RateLimiter,
    pub delegates: DelegateDetailService,
    /// Forum ids refreshed by `POST /cache`
    pub refresh_forum_ids: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        web: WebConfig,
        rate_limiting: RateLimitingConfig,
        health_cache: HealthCache,
        rate_limiter: RateLimiter,
        delegates: DelegateDetailService,
        refresh_forum_ids: Vec<String>,
    ) -> Self {
        Self {
            web: Arc::new(web),
            rate_limiting: Arc::new(rate_limiting),
            health_cache,
            rate_limiter,
            delegates,
            refresh_forum_ids: Arc::new(refresh_forum_ids),
        }
    }
}
