//! # Error Taxonomy
//!
//! Crate-wide error type. Each variant corresponds to one handling policy:
//! `NotFound` is surfaced to callers, `UpstreamFetch` is recorded into the
//! forum's health entry, `Internal` is logged and reported generically, and
//! `Unconfigured` is returned as a non-fatal delivery outcome.

use std::fmt;
use thiserror::Error;

/// Which external entity failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingEntity {
    Tenant,
    Delegate,
}

impl fmt::Display for MissingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingEntity::Tenant => write!(f, "Tenant"),
            MissingEntity::Delegate => write!(f, "Delegate"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ForumWatchError {
    #[error("{0} not found")]
    NotFound(MissingEntity),

    #[error("Upstream fetch failed for {forum_id}: {message}")]
    UpstreamFetch { forum_id: String, message: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0} not configured")]
    Unconfigured(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] crate::config::ConfigurationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ForumWatchError {
    pub fn tenant_not_found() -> Self {
        Self::NotFound(MissingEntity::Tenant)
    }

    pub fn delegate_not_found() -> Self {
        Self::NotFound(MissingEntity::Delegate)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors raised by store backends (in-memory or Postgres)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ForumWatchError>;
