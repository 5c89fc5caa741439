//! Postgres-backed directory.

use super::models::{Delegate, Tenant};
use super::store::DirectoryStore;
use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PgDirectoryStore {
    pool: PgPool,
}

impl PgDirectoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DirectoryStore for PgDirectoryStore {
    async fn get_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT id, slug, name, forum_url FROM tenants WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    async fn get_delegate_by_username(
        &self,
        tenant_id: Uuid,
        username: &str,
    ) -> Result<Option<Delegate>, StoreError> {
        let delegate = sqlx::query_as::<_, Delegate>(
            r#"
            SELECT id, tenant_id, username, display_name, bio, wallet_address, created_at
            FROM delegates
            WHERE tenant_id = $1 AND username = $2
            "#,
        )
        .bind(tenant_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(delegate)
    }
}
