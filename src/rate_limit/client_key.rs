//! Client key derivation from request headers.

use crate::constants::{headers, rate_limit::FALLBACK_CLIENT_KEY};
use axum::http::HeaderMap;

/// Identify the client behind a request
///
/// Prefers the first hop of `X-Forwarded-For`, then `X-Real-IP`. Clients with
/// neither share the fallback bucket and are limited as one aggregate.
pub fn client_key_from_headers(request_headers: &HeaderMap) -> String {
    first_forwarded(request_headers)
        .or_else(|| header_value(request_headers, headers::REAL_IP))
        .unwrap_or_else(|| FALLBACK_CLIENT_KEY.to_string())
}

fn first_forwarded(request_headers: &HeaderMap) -> Option<String> {
    header_value(request_headers, headers::FORWARDED_FOR).and_then(|chain| {
        chain
            .split(',')
            .next()
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(str::to_string)
    })
}

fn header_value(request_headers: &HeaderMap, name: &str) -> Option<String> {
    request_headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
