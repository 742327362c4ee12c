//! Upstream CLI commands
//!
//! Read-only views of the upstreams registered with the control plane.
//! Upstream lifecycle is owned by discovery, not this client.

use anyhow::Result;
use clap::Subcommand;

use super::output::{self, OutputFormat};
use crate::domain::Upstream;
use crate::storage::ConfigStore;

#[derive(Subcommand)]
pub enum UpstreamCommands {
    /// List all upstreams
    List {
        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Get a specific upstream by name
    Get {
        /// Upstream name
        name: String,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },
}

/// Handle upstream commands
pub async fn handle_upstream_command(
    command: UpstreamCommands,
    store: &dyn ConfigStore,
) -> Result<()> {
    match command {
        UpstreamCommands::List { output } => list_upstreams(store, &output).await?,
        UpstreamCommands::Get { name, output } => get_upstream(store, &name, &output).await?,
    }

    Ok(())
}

async fn list_upstreams(store: &dyn ConfigStore, output: &str) -> Result<()> {
    let upstreams = store.list_upstreams().await?;
    print_upstreams(&upstreams, output)
}

async fn get_upstream(store: &dyn ConfigStore, name: &str, output: &str) -> Result<()> {
    let upstream = store.get_upstream(name).await?;
    print_upstreams(&[upstream], output)
}

fn print_upstreams(upstreams: &[Upstream], output: &str) -> Result<()> {
    if upstreams.is_empty() {
        println!("No upstreams found");
        return Ok(());
    }

    let format = OutputFormat::from_str(output)?;
    match format {
        OutputFormat::Summary => print_upstreams_table(upstreams),
        _ => output::print_each(upstreams, format),
    }
    Ok(())
}

fn print_upstreams_table(upstreams: &[Upstream]) {
    output::print_table_header(&[("Name", 30), ("Type", 15), ("Spec Keys", 40)]);

    for upstream in upstreams {
        let keys: Vec<&str> = upstream.spec.keys().map(String::as_str).collect();
        println!(
            "{:<30} {:<15} {:<40}",
            output::truncate(&upstream.name, 28),
            output::truncate(&upstream.upstream_type, 13),
            output::truncate(&keys.join(", "), 38)
        );
    }
    println!();
}
