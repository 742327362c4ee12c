//! Storage layer
//!
//! The control plane is reached through the narrow [`ConfigStore`]
//! interface: list/get per object kind plus virtual host mutation. The
//! REST implementation talks to the real control plane; the memory
//! implementation backs tests and local dry runs. Consistency across
//! concurrent clients is the store's problem, not ours — this client
//! performs no locking of its own.

pub mod memory;
pub mod rest;

use async_trait::async_trait;

use crate::domain::{Upstream, VirtualHost};
use crate::errors::Result;

pub use memory::MemoryConfigStore;
pub use rest::{RestConfigStore, StoreConfig};

/// Narrow interface to the control plane's configuration store.
///
/// Implementations must surface "already exists" on creation and "not
/// found" on lookup as classifiable errors (see
/// [`PorticoError::is_already_exists`](crate::errors::PorticoError::is_already_exists)),
/// since resolver idempotency depends on telling those apart from
/// transport failures.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// All upstreams known to the control plane, in store order
    async fn list_upstreams(&self) -> Result<Vec<Upstream>>;

    /// A single upstream by name
    async fn get_upstream(&self, name: &str) -> Result<Upstream>;

    /// All virtual hosts known to the control plane
    async fn list_virtual_hosts(&self) -> Result<Vec<VirtualHost>>;

    /// A single virtual host by name
    async fn get_virtual_host(&self, name: &str) -> Result<VirtualHost>;

    /// Create a virtual host; already-exists must be classifiable
    async fn create_virtual_host(&self, virtual_host: &VirtualHost) -> Result<VirtualHost>;

    /// Replace an existing virtual host
    async fn update_virtual_host(&self, virtual_host: &VirtualHost) -> Result<VirtualHost>;

    /// Remove a virtual host by name
    async fn delete_virtual_host(&self, name: &str) -> Result<()>;
}
