//! Route CLI commands
//!
//! Builds routes from flags or files, attaches them to virtual hosts
//! and renders them for display.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use super::output::{self, OutputFormat};
use crate::domain::{KubeUpstreamRef, Matcher, PathMatch, Route, RouteAction};
use crate::services::{resolve_virtual_host, route_from_details, RouteDetails};
use crate::storage::ConfigStore;

#[derive(Subcommand)]
pub enum RouteCommands {
    /// Create a route and attach it to a virtual host
    Create {
        #[command(flatten)]
        target: TargetFlags,

        #[command(flatten)]
        route: RouteFlags,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Show the routes attached to a virtual host
    Get {
        #[command(flatten)]
        target: TargetFlags,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Remove matching routes from a virtual host
    Delete {
        #[command(flatten)]
        target: TargetFlags,

        #[command(flatten)]
        route: RouteFlags,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },
}

/// Selects the virtual host a route command operates on
#[derive(Args, Debug, Default)]
pub struct TargetFlags {
    /// Virtual host name to operate on
    #[arg(long)]
    pub virtual_host: Option<String>,

    /// Domain owning the virtual host to operate on
    #[arg(long)]
    pub domain: Option<String>,
}

/// Route definition flags; `--file` replaces the whole set
#[derive(Args, Debug, Default)]
pub struct RouteFlags {
    /// Path to a JSON or YAML file with the route definition
    #[arg(
        short,
        long,
        conflicts_with_all = [
            "event", "path_exact", "path_regex", "path_prefix", "method", "header",
            "upstream", "function", "prefix_rewrite",
            "kube_upstream", "kube_namespace", "kube_port",
        ]
    )]
    pub file: Option<PathBuf>,

    /// Event type to match
    #[arg(long)]
    pub event: Option<String>,

    /// Exact path to match
    #[arg(long)]
    pub path_exact: Option<String>,

    /// Path regex to match
    #[arg(long)]
    pub path_regex: Option<String>,

    /// Path prefix to match
    #[arg(long)]
    pub path_prefix: Option<String>,

    /// Comma-separated HTTP methods to match
    #[arg(long)]
    pub method: Option<String>,

    /// Comma-separated name:value header matches
    #[arg(long)]
    pub header: Option<String>,

    /// Upstream to send matched traffic to
    #[arg(long)]
    pub upstream: Option<String>,

    /// Function on the upstream to invoke
    #[arg(long)]
    pub function: Option<String>,

    /// Path prefix rewrite applied before forwarding
    #[arg(long)]
    pub prefix_rewrite: Option<String>,

    /// Kubernetes service name to resolve into an upstream
    #[arg(long)]
    pub kube_upstream: Option<String>,

    /// Namespace filter for --kube-upstream
    #[arg(long)]
    pub kube_namespace: Option<String>,

    /// Service port filter for --kube-upstream
    #[arg(long)]
    pub kube_port: Option<u16>,
}

impl RouteFlags {
    fn into_details(self) -> RouteDetails {
        let kube = self
            .kube_upstream
            .filter(|name| !name.is_empty())
            .map(|name| KubeUpstreamRef {
                name,
                namespace: self.kube_namespace.filter(|ns| !ns.is_empty()),
                port: self.kube_port,
            });

        RouteDetails {
            event: self.event,
            path_exact: self.path_exact,
            path_regex: self.path_regex,
            path_prefix: self.path_prefix,
            methods: self.method,
            headers: self.header,
            upstream: self.upstream,
            function: self.function,
            prefix_rewrite: self.prefix_rewrite,
            kube,
        }
    }
}

/// Handle route commands
pub async fn handle_route_command(command: RouteCommands, store: &dyn ConfigStore) -> Result<()> {
    match command {
        RouteCommands::Create { target, route, output } => {
            create_route(store, target, route, &output).await?
        }
        RouteCommands::Get { target, output } => get_routes(store, target, &output).await?,
        RouteCommands::Delete { target, route, output } => {
            delete_route(store, target, route, &output).await?
        }
    }

    Ok(())
}

async fn create_route(
    store: &dyn ConfigStore,
    target: TargetFlags,
    flags: RouteFlags,
    output: &str,
) -> Result<()> {
    let route = load_or_build_route(store, flags).await?;

    let resolved = resolve_virtual_host(
        store,
        target.virtual_host.as_deref(),
        target.domain.as_deref(),
        true,
    )
    .await?;

    let mut virtual_host = resolved.virtual_host;
    virtual_host.routes.push(route.clone());
    store.update_virtual_host(&virtual_host).await?;

    print_routes(&[route], output)
}

async fn get_routes(store: &dyn ConfigStore, target: TargetFlags, output: &str) -> Result<()> {
    let resolved = resolve_virtual_host(
        store,
        target.virtual_host.as_deref(),
        target.domain.as_deref(),
        false,
    )
    .await?;

    print_routes(&resolved.virtual_host.routes, output)
}

async fn delete_route(
    store: &dyn ConfigStore,
    target: TargetFlags,
    flags: RouteFlags,
    output: &str,
) -> Result<()> {
    let route = load_or_build_route(store, flags).await?;

    let resolved = resolve_virtual_host(
        store,
        target.virtual_host.as_deref(),
        target.domain.as_deref(),
        false,
    )
    .await?;

    let mut virtual_host = resolved.virtual_host;
    let before = virtual_host.routes.len();
    virtual_host.routes.retain(|existing| existing != &route);
    let removed = before - virtual_host.routes.len();

    if removed == 0 {
        anyhow::bail!("no matching route found on virtual host '{}'", virtual_host.name);
    }

    store.update_virtual_host(&virtual_host).await?;

    println!("Removed {} route(s) from virtual host '{}'", removed, virtual_host.name);
    print_routes(&virtual_host.routes, output)
}

/// Route from `--file` when given, otherwise from the individual flags
/// (resolving any Kubernetes upstream reference against the store).
async fn load_or_build_route(store: &dyn ConfigStore, flags: RouteFlags) -> Result<Route> {
    if let Some(path) = &flags.file {
        return parse_route_file(path);
    }
    Ok(route_from_details(store, flags.into_details()).await?)
}

fn parse_route_file(path: &Path) -> Result<Route> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML route from {}", path.display())),
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON route from {}", path.display())),
    }
}

/// Print routes in the requested format. An empty list prints a notice
/// instead of nothing.
pub fn print_routes(routes: &[Route], output: &str) -> Result<()> {
    if routes.is_empty() {
        println!("No routes defined");
        return Ok(());
    }

    let format = OutputFormat::from_str(output)?;
    match format {
        OutputFormat::Summary => {
            for route in routes {
                println!("{}\n", route_summary(route));
            }
        }
        _ => output::print_each(routes, format),
    }
    Ok(())
}

fn route_summary(route: &Route) -> String {
    format!("{}\n -> {}", matcher_summary(&route.matcher), action_summary(&route.action))
}

fn matcher_summary(matcher: &Matcher) -> String {
    match matcher {
        Matcher::Event { event_type } => format!("event       : {}", event_type),
        Matcher::Request { path, methods, headers } => {
            let mut out = match path {
                PathMatch::Exact { value } => format!("exact path  : {}", value),
                PathMatch::Regex { value } => format!("regex path  : {}", value),
                PathMatch::Prefix { value } => format!("path prefix : {}", value),
            };
            if !methods.is_empty() {
                out.push_str(&format!("\nmethods     : {}", methods.join(", ")));
            }
            if !headers.is_empty() {
                let rendered: Vec<String> =
                    headers.iter().map(|(name, value)| format!("{}: {}", name, value)).collect();
                out.push_str(&format!("\nheaders     : {}", rendered.join(", ")));
            }
            out
        }
    }
}

fn action_summary(action: &RouteAction) -> String {
    match action {
        RouteAction::Upstream { name } => name.clone(),
        RouteAction::Function { upstream_name, function_name } => {
            format!("{}/{}", upstream_name, function_name)
        }
        RouteAction::Weighted { destinations } => {
            let mut out = String::from("[\n");
            for destination in destinations {
                let rendered = match &destination.function {
                    Some(function) => format!("{}/{}", destination.upstream, function),
                    None => destination.upstream.clone(),
                };
                out.push_str(&format!("  {:>3}, {}\n", destination.weight, rendered));
            }
            out.push(']');
            out
        }
    }
}
