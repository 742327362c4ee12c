//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.porticoctl/config.toml

use anyhow::{Context, Result};
use clap::Subcommand;

use super::config::CliConfig;
use super::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Output format (json, yaml, or summary)
        #[arg(short, long, default_value = "yaml")]
        output: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (token, base_url, or timeout)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands
pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => init_config(force)?,
        ConfigCommands::Show { output } => show_config(&output)?,
        ConfigCommands::Set { key, value } => set_config(&key, &value)?,
        ConfigCommands::Path => show_config_path()?,
    }

    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = CliConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    let config = CliConfig::default();
    config.save()?;

    println!("Configuration file created at: {}", path.display());
    println!("\nYou can now set values using:");
    println!("  porticoctl config set token <your-token>");
    println!("  porticoctl config set base_url <api-url>");
    println!("  porticoctl config set timeout <seconds>");

    Ok(())
}

fn show_config(output_format: &str) -> Result<()> {
    let path = CliConfig::config_path()?;

    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'porticoctl config init' to create one");
        return Ok(());
    }

    let config = CliConfig::load()?;

    match OutputFormat::from_str(output_format)? {
        OutputFormat::Summary => print_config_table(&config),
        OutputFormat::Json => output::print_json(&config)?,
        OutputFormat::Yaml => output::print_yaml(&config)?,
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load().unwrap_or_default();

    match key {
        "token" => {
            config.token = Some(value.to_string());
            println!("Token set successfully");
        }
        "base_url" => {
            config.base_url = Some(value.to_string());
            println!("Base URL set to: {}", value);
        }
        "timeout" => {
            let timeout: u64 =
                value.parse().context("Invalid timeout value. Must be a number in seconds")?;
            config.timeout = Some(timeout);
            println!("Timeout set to: {} seconds", timeout);
        }
        _ => {
            anyhow::bail!(
                "Unknown configuration key: '{}'. Valid keys: token, base_url, timeout",
                key
            );
        }
    }

    config.save()?;

    let path = CliConfig::config_path()?;
    println!("Configuration saved to: {}", path.display());

    Ok(())
}

fn show_config_path() -> Result<()> {
    let path = CliConfig::config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn print_config_table(config: &CliConfig) {
    output::print_table_header(&[("Key", 15), ("Value", 50)]);

    println!("{:<15} {}", "token", config.token.as_deref().map(|_| "<set>").unwrap_or("<not set>"));
    println!("{:<15} {}", "base_url", config.base_url.as_deref().unwrap_or("<not set>"));
    println!(
        "{:<15} {}",
        "timeout",
        config
            .timeout
            .map(|t| format!("{} seconds", t))
            .unwrap_or_else(|| "<not set>".to_string())
    );
    println!();
}
