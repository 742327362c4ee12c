//! Service layer
//!
//! Business logic between the CLI and the configuration store: route
//! construction from flag-level details, upstream reference resolution
//! and virtual host resolution.

pub mod route_builder;
pub mod upstream_resolver;
pub mod virtual_host_resolver;

pub use route_builder::{build_route, route_from_details, RouteDetails};
pub use upstream_resolver::resolve_kube_upstream;
pub use virtual_host_resolver::{
    ensure_default_virtual_host, resolve_virtual_host, ResolvedVirtualHost,
};
