#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # ForumWatch Core
//!
//! Bounded, time-sensitive state behind a forum monitoring API.
//!
//! ## Overview
//!
//! Three components keep process-local state correct under concurrent
//! access without a database round-trip on the hot path:
//!
//! - **Health cache** - last-known reachability per forum, read
//!   synchronously and refreshed in the background without blocking callers.
//! - **Rate limiter** - fixed-window request counting per client key, with
//!   an owned sweep loop pruning closed windows.
//! - **Snapshot history** - most-recent-first reads over each delegate's
//!   append-only snapshot sequence, plus derived latest, chart and trend views.
//!
//! The HTTP surface in [`web`] applies the rate limiter, reads and triggers
//! the health cache, and assembles delegate detail through [`services`].
//!
//! ## Module Organization
//!
//! - [`health`] - Health cache, fetch collaborator, scheduled refresh
//! - [`rate_limit`] - Rate limiter, client key derivation, sweeper
//! - [`snapshots`] - Snapshot store, history view, avatar resolution
//! - [`directory`] - Tenant and delegate lookup boundary
//! - [`services`] - Delegate detail assembly
//! - [`notifications`] - Email delivery boundary
//! - [`web`] - Axum routes, middleware and error mapping
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use forumwatch_core::rate_limit::{RateLimitPolicy, RateLimiter};
//!
//! let limiter = RateLimiter::in_memory();
//! let policy = RateLimitPolicy::new(60_000, 2);
//!
//! assert!(limiter.check("10.0.0.1", policy).allowed);
//! assert!(limiter.check("10.0.0.1", policy).allowed);
//! assert!(!limiter.check("10.0.0.1", policy).allowed);
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit, integration and property tests
//! ```

pub mod background;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod health;
pub mod logging;
pub mod notifications;
pub mod rate_limit;
pub mod services;
pub mod snapshots;
pub mod web;

pub use bootstrap::ForumWatchService;
pub use config::{ConfigManager, ForumWatchConfig};
pub use error::{ForumWatchError, MissingEntity, Result, StoreError};
pub use health::{CacheStats, ForumHealthEntry, HealthCache, HealthStatus, RefreshHandle};
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use services::{DelegateDetail, DelegateDetailService};
pub use snapshots::{resolve_avatar_url, Snapshot, SnapshotHistory, SnapshotStore};
