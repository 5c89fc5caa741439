//! # Snapshot History
//!
//! Read path over the append-only sequence of delegate statistic snapshots
//! written by an external collector. The store answers "latest N, newest
//! first"; [`SnapshotHistory`] derives the latest snapshot, the chart
//! projection and the trend deltas from that window.
//!
//! ```
//! use forumwatch_core::snapshots::resolve_avatar_url;
//!
//! assert_eq!(
//!     resolve_avatar_url(Some("/user_avatar/{size}.png"), "https://forum.example"),
//!     "https://forum.example/user_avatar/120.png"
//! );
//! ```

pub mod avatar;
pub mod history;
pub mod models;
pub mod postgres;
pub mod store;

pub use avatar::resolve_avatar_url;
pub use history::SnapshotHistory;
pub use models::{RecentPost, Snapshot, SnapshotHistoryPoint, SnapshotStats, SnapshotTrend};
pub use postgres::PgSnapshotStore;
pub use store::{InMemorySnapshotStore, SnapshotStore};
