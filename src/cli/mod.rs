//! # Command Line Interface
//!
//! Provides CLI commands for route, virtual host and upstream
//! management against the Portico control plane, plus local
//! configuration handling.

pub mod config;
pub mod config_cmd;
pub mod output;
pub mod routes;
pub mod upstreams;
pub mod virtual_hosts;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use url::Url;

use crate::storage::{RestConfigStore, StoreConfig};

#[derive(Parser)]
#[command(name = "porticoctl")]
#[command(about = "CLI client for the Portico API gateway control plane")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Personal access token for API authentication
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Path to file containing personal access token
    #[arg(long, global = true)]
    pub token_file: Option<std::path::PathBuf>,

    /// Base URL for the control plane API
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Route management commands
    Route {
        #[command(subcommand)]
        command: routes::RouteCommands,
    },

    /// Virtual host management commands
    #[command(alias = "virtualhost")]
    Vhost {
        #[command(subcommand)]
        command: virtual_hosts::VirtualHostCommands,
    },

    /// Upstream management commands
    Upstream {
        #[command(subcommand)]
        command: upstreams::UpstreamCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialise_logging(cli.verbose)?;

    match cli.command {
        Commands::Config { command } => config_cmd::handle_config_command(command).await?,
        Commands::Route { command } => {
            let store =
                create_config_store(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            routes::handle_route_command(command, &store).await?
        }
        Commands::Vhost { command } => {
            let store =
                create_config_store(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            virtual_hosts::handle_virtual_host_command(command, &store).await?
        }
        Commands::Upstream { command } => {
            let store =
                create_config_store(cli.token, cli.token_file, cli.base_url, cli.timeout, cli.verbose)?;
            upstreams::handle_upstream_command(command, &store).await?
        }
    }

    Ok(())
}

/// Create a REST config store with resolved connection settings
fn create_config_store(
    token: Option<String>,
    token_file: Option<std::path::PathBuf>,
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: bool,
) -> anyhow::Result<RestConfigStore> {
    let token = config::resolve_token(token, token_file)?;
    let base_url = config::resolve_base_url(base_url);
    Url::parse(&base_url).with_context(|| format!("Invalid base URL: {}", base_url))?;
    let timeout = config::resolve_timeout(timeout);

    let store_config = StoreConfig { base_url, token, timeout, verbose };

    Ok(RestConfigStore::new(store_config)?)
}

fn initialise_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", default_level);
    }

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere (e.g. integration tests); ignore.
    }
    Ok(())
}
