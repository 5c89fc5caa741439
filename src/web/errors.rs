//! # Web API Error Types
//!
//! Maps domain failures onto HTTP responses. Bodies are always
//! `{ "error": "<message>" }`; internal details are logged, never returned.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;
use crate::error::{ForumWatchError, MissingEntity};
use crate::logging::log_error;
use crate::rate_limit::RateLimitDecision;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(MissingEntity),

    #[error("Too many requests")]
    TooManyRequests {
        reset_at: DateTime<Utc>,
        retry_after_secs: u64,
    },

    #[error("Internal server error")]
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn rate_limited(decision: &RateLimitDecision, now: DateTime<Utc>) -> Self {
        Self::TooManyRequests {
            reset_at: decision.reset_at,
            retry_after_secs: decision.retry_after_secs(now),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            ApiError::TooManyRequests {
                reset_at,
                retry_after_secs,
            } => {
                let body = json!({
                    "error": "Too many requests",
                    "resetAt": reset_at,
                });
                let mut response = (status, Json(body)).into_response();
                response
                    .headers_mut()
                    .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
                response
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

impl From<ForumWatchError> for ApiError {
    fn from(err: ForumWatchError) -> Self {
        match err {
            ForumWatchError::NotFound(entity) => ApiError::NotFound(entity),
            other => {
                log_error("web", "request", &other.to_string(), None);
                ApiError::Internal
            }
        }
    }
}
