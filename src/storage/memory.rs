//! In-process configuration store
//!
//! Map-backed [`ConfigStore`] used by tests and local dry runs. Error
//! classification matches the REST store so resolver behavior is
//! identical against either backend. Upstream order is insertion
//! order, which the resolver's first-match-wins scan depends on.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::ConfigStore;
use crate::domain::{Upstream, VirtualHost};
use crate::errors::{PorticoError, Result};

#[derive(Debug, Default)]
struct Inner {
    upstreams: Vec<Upstream>,
    virtual_hosts: BTreeMap<String, VirtualHost>,
}

/// Ephemeral store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    inner: Mutex<Inner>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with the given upstreams, in order
    pub fn with_upstreams(upstreams: Vec<Upstream>) -> Self {
        let store = Self::new();
        store.locked().upstreams = upstreams;
        store
    }

    /// Append an upstream, preserving insertion order
    pub fn insert_upstream(&self, upstream: Upstream) {
        self.locked().upstreams.push(upstream);
    }

    /// Seed a virtual host directly, replacing any existing one
    pub fn insert_virtual_host(&self, virtual_host: VirtualHost) {
        self.locked()
            .virtual_hosts
            .insert(virtual_host.name.clone(), virtual_host);
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn list_upstreams(&self) -> Result<Vec<Upstream>> {
        Ok(self.locked().upstreams.clone())
    }

    async fn get_upstream(&self, name: &str) -> Result<Upstream> {
        self.locked()
            .upstreams
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| PorticoError::not_found("upstream", name))
    }

    async fn list_virtual_hosts(&self) -> Result<Vec<VirtualHost>> {
        Ok(self.locked().virtual_hosts.values().cloned().collect())
    }

    async fn get_virtual_host(&self, name: &str) -> Result<VirtualHost> {
        self.locked()
            .virtual_hosts
            .get(name)
            .cloned()
            .ok_or_else(|| PorticoError::not_found("virtual host", name))
    }

    async fn create_virtual_host(&self, virtual_host: &VirtualHost) -> Result<VirtualHost> {
        let mut inner = self.locked();
        if inner.virtual_hosts.contains_key(&virtual_host.name) {
            return Err(PorticoError::already_exists("virtual host", &virtual_host.name));
        }
        inner
            .virtual_hosts
            .insert(virtual_host.name.clone(), virtual_host.clone());
        Ok(virtual_host.clone())
    }

    async fn update_virtual_host(&self, virtual_host: &VirtualHost) -> Result<VirtualHost> {
        let mut inner = self.locked();
        if !inner.virtual_hosts.contains_key(&virtual_host.name) {
            return Err(PorticoError::not_found("virtual host", &virtual_host.name));
        }
        inner
            .virtual_hosts
            .insert(virtual_host.name.clone(), virtual_host.clone());
        Ok(virtual_host.clone())
    }

    async fn delete_virtual_host(&self, name: &str) -> Result<()> {
        self.locked()
            .virtual_hosts
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| PorticoError::not_found("virtual host", name))
    }
}
