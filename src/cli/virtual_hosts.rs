//! Virtual host CLI commands
//!
//! Create, inspect, update and delete virtual hosts on the control
//! plane. Domain-based lookups go through the resolver so name-less
//! invocations behave exactly like route targeting.

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};
use validator::Validate;

use super::output::{self, OutputFormat};
use crate::domain::VirtualHost;
use crate::errors::PorticoError;
use crate::services::resolve_virtual_host;
use crate::storage::ConfigStore;

#[derive(Subcommand)]
pub enum VirtualHostCommands {
    /// Create a new virtual host
    Create {
        /// Virtual host name
        #[arg(long, conflicts_with = "file")]
        name: Option<String>,

        /// Comma-separated domains the virtual host serves
        #[arg(long, value_delimiter = ',', conflicts_with = "file")]
        domains: Vec<String>,

        /// Path to a JSON or YAML file with the virtual host definition
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Get a virtual host by name or owning domain
    Get {
        /// Virtual host name
        name: Option<String>,

        /// Domain owned by the virtual host
        #[arg(long)]
        domain: Option<String>,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// List all virtual hosts
    List {
        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Update a virtual host from a file
    Update {
        /// Path to a JSON or YAML file with the virtual host definition
        #[arg(short, long)]
        file: PathBuf,

        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "summary")]
        output: String,
    },

    /// Delete a virtual host
    Delete {
        /// Virtual host name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Handle virtual host commands
pub async fn handle_virtual_host_command(
    command: VirtualHostCommands,
    store: &dyn ConfigStore,
) -> Result<()> {
    match command {
        VirtualHostCommands::Create { name, domains, file, output } => {
            create_virtual_host(store, name, domains, file, &output).await?
        }
        VirtualHostCommands::Get { name, domain, output } => {
            get_virtual_host(store, name, domain, &output).await?
        }
        VirtualHostCommands::List { output } => list_virtual_hosts(store, &output).await?,
        VirtualHostCommands::Update { file, output } => {
            update_virtual_host(store, file, &output).await?
        }
        VirtualHostCommands::Delete { name, yes } => delete_virtual_host(store, &name, yes).await?,
    }

    Ok(())
}

async fn create_virtual_host(
    store: &dyn ConfigStore,
    name: Option<String>,
    domains: Vec<String>,
    file: Option<PathBuf>,
    output: &str,
) -> Result<()> {
    let virtual_host = match file {
        Some(path) => parse_virtual_host_file(&path)?,
        None => {
            let name = name.context("either --name or --file is required")?;
            VirtualHost { name, domains, routes: Vec::new() }
        }
    };
    virtual_host.validate().map_err(PorticoError::from)?;

    let created = store.create_virtual_host(&virtual_host).await?;
    print_virtual_hosts(&[created], output)
}

async fn get_virtual_host(
    store: &dyn ConfigStore,
    name: Option<String>,
    domain: Option<String>,
    output: &str,
) -> Result<()> {
    let resolved =
        resolve_virtual_host(store, name.as_deref(), domain.as_deref(), false).await?;
    print_virtual_hosts(&[resolved.virtual_host], output)
}

async fn list_virtual_hosts(store: &dyn ConfigStore, output: &str) -> Result<()> {
    let virtual_hosts = store.list_virtual_hosts().await?;
    print_virtual_hosts(&virtual_hosts, output)
}

async fn update_virtual_host(store: &dyn ConfigStore, file: PathBuf, output: &str) -> Result<()> {
    let virtual_host = parse_virtual_host_file(&file)?;
    virtual_host.validate().map_err(PorticoError::from)?;

    let updated = store.update_virtual_host(&virtual_host).await?;
    print_virtual_hosts(&[updated], output)
}

async fn delete_virtual_host(store: &dyn ConfigStore, name: &str, yes: bool) -> Result<()> {
    if !yes {
        println!("Are you sure you want to delete virtual host '{}'? (y/N)", name);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(());
        }
    }

    store.delete_virtual_host(name).await?;

    println!("Virtual host '{}' deleted successfully", name);
    Ok(())
}

fn parse_virtual_host_file(path: &Path) -> Result<VirtualHost> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML virtual host from {}", path.display())),
        _ => serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON virtual host from {}", path.display())),
    }
}

fn print_virtual_hosts(virtual_hosts: &[VirtualHost], output: &str) -> Result<()> {
    if virtual_hosts.is_empty() {
        println!("No virtual hosts found");
        return Ok(());
    }

    let format = OutputFormat::from_str(output)?;
    match format {
        OutputFormat::Summary => print_virtual_hosts_table(virtual_hosts),
        _ => output::print_each(virtual_hosts, format),
    }
    Ok(())
}

fn print_virtual_hosts_table(virtual_hosts: &[VirtualHost]) {
    output::print_table_header(&[("Name", 30), ("Domains", 40), ("Routes", 8)]);

    for virtual_host in virtual_hosts {
        println!(
            "{:<30} {:<40} {:<8}",
            output::truncate(&virtual_host.name, 28),
            output::truncate(&virtual_host.domains.join(", "), 38),
            virtual_host.routes.len()
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryConfigStore;
    use std::io::Write;

    #[tokio::test]
    async fn test_create_rejects_invalid_domains() {
        let store = MemoryConfigStore::new();
        let result = create_virtual_host(
            &store,
            Some("shop".to_string()),
            vec!["bad domain".to_string()],
            None,
            "summary",
        )
        .await;
        assert!(result.is_err());

        // Nothing was stored.
        assert!(store.get_virtual_host("shop").await.is_err());
    }

    #[tokio::test]
    async fn test_create_requires_name_or_file() {
        let store = MemoryConfigStore::new();
        let result = create_virtual_host(&store, None, Vec::new(), None, "summary").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_virtual_host_file_yaml() {
        let yaml = "name: shop\ndomains:\n  - shop.example.com\n";
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let virtual_host = parse_virtual_host_file(file.path()).unwrap();
        assert_eq!(virtual_host.name, "shop");
        assert_eq!(virtual_host.domains, vec!["shop.example.com".to_string()]);
        assert!(virtual_host.routes.is_empty());
    }
}
