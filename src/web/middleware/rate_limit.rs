//! Per-client request admission.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::constants::headers;
use crate::logging::log_rate_limited;
use crate::rate_limit::{client_key_from_headers, RateLimitDecision};
use crate::web::errors::ApiError;
use crate::web::state::AppState;

/// Admit or reject the request under the configured policy
///
/// Admitted and rejected responses both carry the `X-RateLimit-*` headers;
/// rejections are 429 with `Retry-After`.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.rate_limiting.enabled {
        return next.run(request).await;
    }

    let key = client_key_from_headers(request.headers());
    let now = Utc::now();
    let decision = state
        .rate_limiter
        .check_at(&key, state.rate_limiting.policy(), now);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        log_rate_limited(&key, decision.limit, decision.reset_at);
        ApiError::rate_limited(&decision, now).into_response()
    };

    insert_rate_limit_headers(response.headers_mut(), &decision);
    response
}

fn insert_rate_limit_headers(response_headers: &mut HeaderMap, decision: &RateLimitDecision) {
    response_headers.insert(
        HeaderName::from_static(headers::RATE_LIMIT_LIMIT),
        HeaderValue::from(decision.limit),
    );
    response_headers.insert(
        HeaderName::from_static(headers::RATE_LIMIT_REMAINING),
        HeaderValue::from(decision.remaining),
    );
    response_headers.insert(
        HeaderName::from_static(headers::RATE_LIMIT_RESET),
        HeaderValue::from(decision.reset_at.timestamp()),
    );
}
