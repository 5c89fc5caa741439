//! Forum fetch collaborator.
//!
//! The cache treats a fetch as opaque: it either yields a report or fails
//! with a diagnostic. `HttpForumFetcher` is the production implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

/// What a successful fetch learned about a forum
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForumFetchReport {
    /// Reachable but slow or partially failing
    pub degraded: bool,
    pub response_time_ms: Option<u64>,
}

impl ForumFetchReport {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn degraded() -> Self {
        Self {
            degraded: true,
            response_time_ms: None,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("forum not configured: {0}")]
    NotConfigured(String),

    #[error("forum unreachable: {0}")]
    Unreachable(String),

    #[error("forum responded with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("fetch timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait ForumFetcher: Send + Sync + fmt::Debug {
    async fn fetch(&self, forum_id: &str) -> Result<ForumFetchReport, FetchError>;
}

/// Checks forum reachability with a plain GET against its configured base URL
#[derive(Debug, Clone)]
pub struct HttpForumFetcher {
    client: Client,
    forum_urls: HashMap<String, String>,
    degraded_threshold: Duration,
}

impl HttpForumFetcher {
    pub fn new(
        forum_urls: HashMap<String, String>,
        request_timeout: Duration,
        degraded_threshold: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .user_agent(concat!("forumwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            forum_urls,
            degraded_threshold,
        })
    }
}

#[async_trait]
impl ForumFetcher for HttpForumFetcher {
    async fn fetch(&self, forum_id: &str) -> Result<ForumFetchReport, FetchError> {
        let url = self
            .forum_urls
            .get(forum_id)
            .ok_or_else(|| FetchError::NotConfigured(forum_id.to_string()))?;

        let started = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    timeout_ms: started.elapsed().as_millis() as u64,
                }
            } else {
                FetchError::Unreachable(e.to_string())
            }
        })?;
        let elapsed = started.elapsed();

        let status = response.status();
        debug!(
            forum_id = %forum_id,
            status = status.as_u16(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Forum fetch completed"
        );

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(ForumFetchReport {
            degraded: elapsed >= self.degraded_threshold,
            response_time_ms: Some(elapsed.as_millis() as u64),
        })
    }
}
