//! Virtual host resolution
//!
//! Locates or creates the virtual host a command targets, by explicit
//! name or by domain, after making sure the reserved default virtual
//! host exists.

use tracing::{debug, info};

use crate::domain::{VirtualHost, DEFAULT_VIRTUAL_HOST};
use crate::errors::{PorticoError, Result};
use crate::storage::ConfigStore;

/// A resolved virtual host plus whether this call created it
#[derive(Debug, Clone)]
pub struct ResolvedVirtualHost {
    pub virtual_host: VirtualHost,
    pub created: bool,
}

/// Create the reserved default virtual host if it is missing.
///
/// Already-exists from the store is the expected steady state and is
/// swallowed; any other creation error is propagated.
pub async fn ensure_default_virtual_host(store: &dyn ConfigStore) -> Result<()> {
    match store.create_virtual_host(&VirtualHost::named(DEFAULT_VIRTUAL_HOST)).await {
        Ok(_) => {
            info!(name = DEFAULT_VIRTUAL_HOST, "created default virtual host");
            Ok(())
        }
        Err(err) if err.is_already_exists() => Ok(()),
        Err(err) => Err(err),
    }
}

/// Resolve the virtual host addressed by `name` or `domain`.
///
/// Resolution order: explicit name (not-found is fatal, never
/// auto-created), then the default virtual host when no domain is
/// given, then domain lookup across all virtual hosts. A domain owned
/// by more than one virtual host is a hard error. With
/// `create_if_missing`, an unclaimed domain gets a new virtual host
/// named after it.
///
/// The domain lookup and the subsequent create are separate store
/// calls; two concurrent invocations can both observe zero matches and
/// race to create, the loser receiving the store's already-exists
/// error. The store interface offers no compare-and-create to close
/// this.
pub async fn resolve_virtual_host(
    store: &dyn ConfigStore,
    name: Option<&str>,
    domain: Option<&str>,
    create_if_missing: bool,
) -> Result<ResolvedVirtualHost> {
    ensure_default_virtual_host(store).await?;

    let name = name.filter(|n| !n.is_empty());
    let domain = domain.filter(|d| !d.is_empty());

    if let Some(name) = name {
        let virtual_host = store.get_virtual_host(name).await?;
        return Ok(ResolvedVirtualHost { virtual_host, created: false });
    }

    let domain = match domain {
        Some(domain) => domain,
        None => {
            let virtual_host = store.get_virtual_host(DEFAULT_VIRTUAL_HOST).await?;
            return Ok(ResolvedVirtualHost { virtual_host, created: false });
        }
    };

    let virtual_hosts = store.list_virtual_hosts().await?;
    let mut candidates: Vec<VirtualHost> = virtual_hosts
        .into_iter()
        .filter(|vh| vh.has_domain(domain))
        .collect();
    debug!(domain, candidates = candidates.len(), "resolved domain candidates");

    match candidates.len() {
        0 => {
            if !create_if_missing {
                return Err(PorticoError::not_found("virtual host for domain", domain));
            }
            let virtual_host = store.create_virtual_host(&VirtualHost::for_domain(domain)).await?;
            info!(domain, "created virtual host for domain");
            Ok(ResolvedVirtualHost { virtual_host, created: true })
        }
        1 => Ok(ResolvedVirtualHost {
            virtual_host: candidates.remove(0),
            created: false,
        }),
        n => Err(PorticoError::conflict(
            format!("domain {} matched {} virtual hosts", domain, n),
            "virtual host",
        )),
    }
}
