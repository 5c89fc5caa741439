use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A monitored forum community
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    /// Unique, URL-safe
    pub slug: String,
    pub name: String,
    /// Base URL that relative avatar paths resolve against
    pub forum_url: String,
}

/// A tracked person within one tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Delegate {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Unique within the tenant
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub wallet_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Tenant fields exposed on delegate detail responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    pub slug: String,
    pub name: String,
    pub forum_url: String,
}

impl From<&Tenant> for TenantSummary {
    fn from(tenant: &Tenant) -> Self {
        Self {
            slug: tenant.slug.clone(),
            name: tenant.name.clone(),
            forum_url: tenant.forum_url.clone(),
        }
    }
}
