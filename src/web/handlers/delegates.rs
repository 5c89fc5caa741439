//! # Delegate Detail Handler

use axum::extract::{Path, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::debug;

use crate::web::errors::ApiResult;
use crate::web::state::AppState;

/// Delegate detail: GET /delegates/:tenant_slug/:username
///
/// Successful responses may be cached downstream for the configured max age
/// and served stale for twice that while revalidating.
pub async fn get_delegate_detail(
    State(state): State<AppState>,
    Path((tenant_slug, username)): Path<(String, String)>,
) -> ApiResult<Response> {
    debug!(tenant_slug = %tenant_slug, username = %username, "Delegate detail requested");

    let detail = state
        .delegates
        .get_delegate_detail(&tenant_slug, &username)
        .await?;

    let mut response = Json(detail).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control(
        state.web.delegate_cache_max_age_seconds,
    )) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}

fn cache_control(max_age_seconds: u64) -> String {
    format!(
        "public, s-maxage={max_age_seconds}, stale-while-revalidate={}",
        max_age_seconds.saturating_mul(2)
    )
}
