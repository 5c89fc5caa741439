//! # Tenant & Delegate Directory
//!
//! Narrow read interface over the durable store that owns tenants and
//! delegates. The core never writes through it.

pub mod models;
pub mod postgres;
pub mod store;

pub use models::{Delegate, Tenant, TenantSummary};
pub use postgres::PgDirectoryStore;
pub use store::{DirectoryStore, InMemoryDirectory};
