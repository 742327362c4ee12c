//! Upstream domain types
//!
//! An upstream is a backend service reference. The spec payload is an
//! opaque map whose interpretation depends on the type tag; only the
//! Kubernetes-typed fields are understood by this client.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tag for Kubernetes service-discovery upstreams
pub const UPSTREAM_TYPE_KUBERNETES: &str = "kubernetes";

/// Spec key holding the Kubernetes service name
pub const KUBE_SPEC_SERVICE_NAME: &str = "service_name";

/// Spec key holding the Kubernetes service namespace
pub const KUBE_SPEC_SERVICE_NAMESPACE: &str = "service_namespace";

/// Spec key holding the Kubernetes service port, stored as a string
pub const KUBE_SPEC_SERVICE_PORT: &str = "service_port";

/// A backend service reference held by the control plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upstream {
    /// Unique identifier within the control plane
    pub name: String,

    /// Discovery type tag (e.g. "kubernetes")
    #[serde(rename = "type")]
    pub upstream_type: String,

    /// Type-specific specification, opaque to this client except for
    /// the Kubernetes keys above
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub spec: Map<String, Value>,
}

impl Upstream {
    /// String-typed spec field, or None when absent or not a string
    pub fn spec_str(&self, key: &str) -> Option<&str> {
        self.spec.get(key).and_then(Value::as_str)
    }
}

/// Transient query for locating a Kubernetes upstream by its service
/// coordinates. Built from flags, consumed once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeUpstreamRef {
    /// Kubernetes service name (required, case-sensitive)
    pub name: String,

    /// Service namespace; None matches any namespace
    pub namespace: Option<String>,

    /// Service port; None matches any port
    pub port: Option<u16>,
}
