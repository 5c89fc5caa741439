//! Tenant and delegate lookup boundary.

use super::models::{Delegate, Tenant};
use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Read interface over the durable tenant/delegate store
#[async_trait]
pub trait DirectoryStore: Send + Sync + fmt::Debug {
    async fn get_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError>;

    async fn get_delegate_by_username(
        &self,
        tenant_id: Uuid,
        username: &str,
    ) -> Result<Option<Delegate>, StoreError>;
}

/// Directory held in process memory, seeded by the caller
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    tenants: RwLock<HashMap<String, Tenant>>,
    delegates: RwLock<HashMap<(Uuid, String), Delegate>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tenant(&self, tenant: Tenant) {
        self.tenants.write().insert(tenant.slug.clone(), tenant);
    }

    pub fn insert_delegate(&self, delegate: Delegate) {
        self.delegates
            .write()
            .insert((delegate.tenant_id, delegate.username.clone()), delegate);
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.read().len()
    }
}

#[async_trait]
impl DirectoryStore for InMemoryDirectory {
    async fn get_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tenants.read().get(slug).cloned())
    }

    async fn get_delegate_by_username(
        &self,
        tenant_id: Uuid,
        username: &str,
    ) -> Result<Option<Delegate>, StoreError> {
        Ok(self
            .delegates
            .read()
            .get(&(tenant_id, username.to_string()))
            .cloned())
    }
}
