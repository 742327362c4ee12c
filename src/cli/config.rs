//! Configuration file handling for the porticoctl CLI
//!
//! Manages loading and saving CLI configuration from
//! ~/.porticoctl/config.toml and resolving connection settings from
//! multiple sources.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// CLI configuration stored in ~/.porticoctl/config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Personal access token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL for the control plane API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl CliConfig {
    /// Get the default configuration file path (~/.porticoctl/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        let mut path = PathBuf::from(home);
        path.push(".porticoctl");
        path.push("config.toml");

        Ok(path)
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to_path(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Resolve the authentication token from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --token command line flag
/// 2. --token-file command line flag
/// 3. ~/.porticoctl/config.toml
/// 4. PORTICOCTL_TOKEN environment variable
pub fn resolve_token(
    token_flag: Option<String>,
    token_file_flag: Option<PathBuf>,
) -> Result<String> {
    if let Some(token) = token_flag {
        debug!("Using token from --token flag");
        return Ok(token);
    }

    if let Some(token_file) = token_file_flag {
        debug!("Reading token from file: {}", token_file.display());
        let token = std::fs::read_to_string(&token_file)
            .with_context(|| format!("Failed to read token file: {}", token_file.display()))?
            .trim()
            .to_string();

        if token.is_empty() {
            anyhow::bail!("Token file is empty: {}", token_file.display());
        }

        return Ok(token);
    }

    if let Ok(config) = CliConfig::load() {
        if let Some(token) = config.token {
            if !token.is_empty() {
                debug!("Using token from config file");
                return Ok(token);
            }
        }
    }

    if let Ok(token) = std::env::var("PORTICOCTL_TOKEN") {
        if !token.is_empty() {
            debug!("Using token from PORTICOCTL_TOKEN environment variable");
            return Ok(token);
        }
    }

    anyhow::bail!(
        "No authentication token found. Please provide a token via:\n\
         - --token flag\n\
         - --token-file flag\n\
         - ~/.porticoctl/config.toml\n\
         - PORTICOCTL_TOKEN environment variable"
    )
}

/// Resolve the base URL from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --base-url command line flag
/// 2. ~/.porticoctl/config.toml
/// 3. PORTICOCTL_BASE_URL environment variable
/// 4. Default: http://localhost:8080
pub fn resolve_base_url(base_url_flag: Option<String>) -> String {
    if let Some(url) = base_url_flag {
        debug!("Using base URL from --base-url flag: {}", url);
        return url;
    }

    if let Ok(config) = CliConfig::load() {
        if let Some(url) = config.base_url {
            if !url.is_empty() {
                debug!("Using base URL from config file: {}", url);
                return url;
            }
        }
    }

    if let Ok(url) = std::env::var("PORTICOCTL_BASE_URL") {
        if !url.is_empty() {
            debug!("Using base URL from PORTICOCTL_BASE_URL environment variable: {}", url);
            return url;
        }
    }

    let default_url = "http://localhost:8080".to_string();
    debug!("Using default base URL: {}", default_url);
    default_url
}

/// Resolve the timeout from multiple sources
///
/// Checks sources in the following priority order:
/// 1. --timeout command line flag
/// 2. ~/.porticoctl/config.toml
/// 3. Default: 30 seconds
pub fn resolve_timeout(timeout_flag: Option<u64>) -> u64 {
    if let Some(timeout) = timeout_flag {
        debug!("Using timeout from --timeout flag: {}s", timeout);
        return timeout;
    }

    if let Ok(config) = CliConfig::load() {
        if let Some(timeout) = config.timeout {
            debug!("Using timeout from config file: {}s", timeout);
            return timeout;
        }
    }

    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = CliConfig {
            token: Some("pat-123".to_string()),
            base_url: Some("https://portico.internal:8443".to_string()),
            timeout: Some(10),
        };
        config.save_to_path(&path).unwrap();

        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.token.as_deref(), Some("pat-123"));
        assert_eq!(loaded.base_url.as_deref(), Some("https://portico.internal:8443"));
        assert_eq!(loaded.timeout, Some(10));
    }

    #[test]
    fn test_missing_config_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert!(loaded.token.is_none());
        assert!(loaded.base_url.is_none());
        assert!(loaded.timeout.is_none());
    }

    #[test]
    fn test_token_file_resolution_trims_contents() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "pat-456\n").unwrap();

        let token = resolve_token(None, Some(token_path)).unwrap();
        assert_eq!(token, "pat-456");
    }

    #[test]
    fn test_empty_token_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "  \n").unwrap();

        assert!(resolve_token(None, Some(token_path)).is_err());
    }

    #[test]
    fn test_flag_wins_over_everything() {
        let token = resolve_token(Some("flag-token".to_string()), None).unwrap();
        assert_eq!(token, "flag-token");

        let url = resolve_base_url(Some("http://flagged:9999".to_string()));
        assert_eq!(url, "http://flagged:9999");

        assert_eq!(resolve_timeout(Some(5)), 5);
    }
}
