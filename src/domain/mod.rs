//! Domain layer
//!
//! Pure domain entities for gateway routing configuration with zero
//! infrastructure dependencies. These are the wire objects the control
//! plane stores and the CLI constructs: routes, virtual hosts and
//! upstream references.

pub mod route;
pub mod upstream;
pub mod virtual_host;

// Re-export main types from each module
pub use route::{Matcher, PathMatch, Route, RouteAction, WeightedDestination};
pub use upstream::{
    KubeUpstreamRef, Upstream, KUBE_SPEC_SERVICE_NAME, KUBE_SPEC_SERVICE_NAMESPACE,
    KUBE_SPEC_SERVICE_PORT, UPSTREAM_TYPE_KUBERNETES,
};
pub use virtual_host::{VirtualHost, DEFAULT_VIRTUAL_HOST};
