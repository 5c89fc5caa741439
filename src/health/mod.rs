//! # Forum Health Cache
//!
//! In-process, eventually-consistent view of forum reachability.
//!
//! ## Architecture
//!
//! - **Store**: `HealthStore` holds one `ForumHealthEntry` per forum and the
//!   cache-wide last refresh time; entries are replaced whole, never patched
//! - **Fetcher**: `ForumFetcher` is the external collaborator that probes a
//!   forum; its failures become `error` entries, never caller-visible errors
//! - **Cache**: `HealthCache` serves synchronous reads and spawns refresh
//!   batches that return a `RefreshHandle` immediately
//! - **Scheduler**: optional owned loop refreshing a fixed forum set
//!
//! ## Usage
//!
//! ```rust,no_run
//! use forumwatch_core::health::{HealthCache, HttpForumFetcher, RefreshSettings};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let urls = HashMap::from([("gov".to_string(), "https://gov.example.org".to_string())]);
//! let fetcher = HttpForumFetcher::new(urls, Duration::from_secs(10), Duration::from_secs(3))?;
//! let cache = HealthCache::in_memory(Arc::new(fetcher), RefreshSettings::default());
//!
//! // Returns immediately; the batch runs in the background
//! let handle = cache.refresh(["gov"]);
//! let _summary = handle.wait().await;
//!
//! println!("{:?}", cache.get_stats());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod fetcher;
pub mod scheduler;
pub mod store;
pub mod types;

pub use cache::{HealthCache, RefreshHandle, RefreshSettings, RefreshSummary};
pub use fetcher::{FetchError, ForumFetchReport, ForumFetcher, HttpForumFetcher};
pub use scheduler::HealthRefreshScheduler;
pub use store::{HealthSnapshot, HealthStore, InMemoryHealthStore};
pub use types::{CacheStats, ForumHealthEntry, HealthStatus};
