//! Route construction from flag-level details
//!
//! Turns the flat parameter set gathered by the CLI into a [`Route`],
//! enforcing matcher and destination exclusivity. Construction is
//! all-or-nothing: any invalid input aborts without a partial object.

use std::collections::BTreeMap;

use crate::domain::{KubeUpstreamRef, Matcher, PathMatch, Route, RouteAction};
use crate::errors::{PorticoError, Result};
use crate::storage::ConfigStore;

use super::upstream_resolver::resolve_kube_upstream;

/// Flat parameter set for a route, one field per flag.
///
/// Empty strings are treated the same as absent values throughout.
#[derive(Debug, Clone, Default)]
pub struct RouteDetails {
    pub event: Option<String>,
    pub path_exact: Option<String>,
    pub path_regex: Option<String>,
    pub path_prefix: Option<String>,

    /// Comma-separated HTTP methods
    pub methods: Option<String>,

    /// Comma-separated `name:value` header constraints
    pub headers: Option<String>,

    pub upstream: Option<String>,
    pub function: Option<String>,
    pub prefix_rewrite: Option<String>,

    /// Kubernetes upstream reference to resolve in place of a plain
    /// upstream name
    pub kube: Option<KubeUpstreamRef>,
}

/// Build a route, resolving a Kubernetes upstream reference first when
/// one is present and substituting the resolved upstream's name.
pub async fn route_from_details(
    store: &dyn ConfigStore,
    mut details: RouteDetails,
) -> Result<Route> {
    if let Some(kube) = details.kube.take() {
        let upstream = resolve_kube_upstream(store, &kube).await?;
        details.upstream = Some(upstream.name);
    }
    build_route(&details)
}

/// Build a route from details alone. Pure; no store access.
pub fn build_route(details: &RouteDetails) -> Result<Route> {
    let matcher = build_matcher(details)?;
    let action = build_action(details)?;

    Ok(Route {
        matcher,
        prefix_rewrite: non_empty(details.prefix_rewrite.as_deref()),
        action,
    })
}

/// An event type claims the matcher outright; otherwise exactly one
/// path match must be given.
fn build_matcher(details: &RouteDetails) -> Result<Matcher> {
    if let Some(event_type) = non_empty(details.event.as_deref()) {
        return Ok(Matcher::Event { event_type });
    }

    let methods = match non_empty(details.methods.as_deref()) {
        Some(raw) => parse_methods(&raw),
        None => Vec::new(),
    };
    let headers = match non_empty(details.headers.as_deref()) {
        Some(raw) => parse_headers(&raw)?,
        None => BTreeMap::new(),
    };

    let mut paths = Vec::new();
    if let Some(value) = non_empty(details.path_exact.as_deref()) {
        paths.push(PathMatch::Exact { value });
    }
    if let Some(value) = non_empty(details.path_regex.as_deref()) {
        paths.push(PathMatch::Regex { value });
    }
    if let Some(value) = non_empty(details.path_prefix.as_deref()) {
        paths.push(PathMatch::Prefix { value });
    }

    if paths.len() > 1 {
        return Err(PorticoError::validation(
            "multiple path matchers specified; provide exactly one of exact, regex or prefix",
        ));
    }
    match paths.into_iter().next() {
        Some(path) => Ok(Matcher::Request { path, methods, headers }),
        None => Err(PorticoError::validation(
            "no matcher specified; provide an event type or a path match",
        )),
    }
}

fn build_action(details: &RouteDetails) -> Result<RouteAction> {
    let upstream = non_empty(details.upstream.as_deref()).ok_or_else(|| {
        PorticoError::validation("no destination specified; an upstream name is required")
    })?;

    match non_empty(details.function.as_deref()) {
        Some(function_name) => Ok(RouteAction::Function {
            upstream_name: upstream,
            function_name,
        }),
        None => Ok(RouteAction::Upstream { name: upstream }),
    }
}

fn parse_methods(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|method| method.trim().to_ascii_uppercase())
        .collect()
}

fn parse_headers(raw: &str) -> Result<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    for entry in raw.split(',') {
        let (name, value) = entry.split_once(':').ok_or_else(|| {
            PorticoError::validation(format!("unable to parse header entries '{}'", raw))
        })?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
