//! Virtual host domain types
//!
//! A virtual host is a named grouping of domains sharing a set of
//! routes. The control plane guarantees name uniqueness; domain
//! ownership is checked client-side at resolution time.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::route::Route;

/// Name of the reserved virtual host that always exists
pub const DEFAULT_VIRTUAL_HOST: &str = "default";

/// A named grouping of domains sharing routing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VirtualHost {
    /// Unique identifier within the control plane
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Domains served by this virtual host; may be empty (the default
    /// virtual host owns no domains)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(custom(function = "validate_domains"))]
    pub domains: Vec<String>,

    /// Routes attached to this virtual host, in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

impl VirtualHost {
    /// A virtual host with the given name and no domains or routes
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            domains: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// A virtual host owning exactly the given domain, named after it
    pub fn for_domain<S: Into<String>>(domain: S) -> Self {
        let domain = domain.into();
        Self {
            name: domain.clone(),
            domains: vec![domain],
            routes: Vec::new(),
        }
    }

    /// Exact string membership test against the domain list
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.iter().any(|d| d == domain)
    }
}

fn validate_domains(domains: &[String]) -> Result<(), ValidationError> {
    for domain in domains {
        if domain.trim().is_empty() {
            return Err(ValidationError::new("empty_domain"));
        }
        if domain.contains(char::is_whitespace) {
            return Err(ValidationError::new("domain_contains_whitespace"));
        }
    }
    Ok(())
}
