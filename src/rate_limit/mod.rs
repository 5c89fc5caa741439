//! # Rate Limiting
//!
//! Fixed, non-overlapping window request counting per client key.
//!
//! ## Architecture
//!
//! - **Store**: `RateLimitStore` owns the entries; the in-memory backend keeps
//!   one `RateLimitEntry` per key and updates it atomically under a per-shard lock
//! - **Limiter**: `RateLimiter::check` turns the updated entry into an
//!   allow/deny decision with remaining budget and window reset time
//! - **Client keys**: derived from forwarded/real address headers, with one
//!   shared fallback bucket for unidentifiable clients
//! - **Sweeper**: expired entries are pruned by an owned background loop on a
//!   fixed interval, never on the hot path
//!
//! State is process-local by default. Each instance of a horizontally scaled
//! deployment enforces its own limits unless a shared `RateLimitStore` is plugged in.
//!
//! ## Usage
//!
//! ```rust
//! use forumwatch_core::rate_limit::{RateLimiter, RateLimitPolicy};
//!
//! let limiter = RateLimiter::in_memory();
//! let policy = RateLimitPolicy::new(1_000, 2);
//!
//! assert!(limiter.check("203.0.113.7", policy).allowed);
//! assert!(limiter.check("203.0.113.7", policy).allowed);
//! assert!(!limiter.check("203.0.113.7", policy).allowed);
//! ```

pub mod client_key;
pub mod limiter;
pub mod store;
pub mod sweeper;

pub use client_key::client_key_from_headers;
pub use limiter::{RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use store::{InMemoryRateLimitStore, RateLimitEntry, RateLimitStore};
pub use sweeper::RateLimitSweeper;
