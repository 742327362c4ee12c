//! REST-backed configuration store
//!
//! Authenticated HTTP client for the Portico control plane API.
//! Non-success statuses are mapped onto the error taxonomy at the call
//! sites that know which resource was being addressed: 404 becomes
//! not-found, 409 on creation becomes already-exists, everything else
//! is surfaced with status and body.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use super::ConfigStore;
use crate::domain::{Upstream, VirtualHost};
use crate::errors::{PorticoError, Result};

const UPSTREAMS_PATH: &str = "/api/v1/upstreams";
const VIRTUAL_HOSTS_PATH: &str = "/api/v1/virtualhosts";

/// Connection settings for the REST store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL for the control plane API (e.g. "http://localhost:8080")
    pub base_url: String,

    /// Personal access token for authentication
    pub token: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Enable verbose request/response logging
    pub verbose: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: String::new(),
            timeout: 30,
            verbose: false,
        }
    }
}

/// Authenticated HTTP client implementing [`ConfigStore`]
#[derive(Debug, Clone)]
pub struct RestConfigStore {
    client: Client,
    config: StoreConfig,
}

impl RestConfigStore {
    /// Create a new store client with the given configuration
    pub fn new(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| PorticoError::transport("failed to build HTTP client", e))?;

        Ok(Self { client, config })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| PorticoError::transport(format!("GET {} failed", path), e))?;

        Self::read_json(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!("POST {}", url);
        self.trace_body(body);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(body)
            .send()
            .await
            .map_err(|e| PorticoError::transport(format!("POST {} failed", path), e))?;

        Self::read_json(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.url(path);
        debug!("PUT {}", url);
        self.trace_body(body);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.token)
            .json(body)
            .send()
            .await
            .map_err(|e| PorticoError::transport(format!("PUT {} failed", path), e))?;

        Self::read_json(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| PorticoError::transport(format!("DELETE {} failed", path), e))?;

        let status = response.status();
        debug!("Response status: {}", status);
        if status.is_success() {
            return Ok(());
        }
        Err(Self::status_error(response).await)
    }

    fn trace_body<B: Serialize>(&self, body: &B) {
        if self.config.verbose {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "<unable to serialize>".to_string());
            trace!("Request body:\n{}", body_json);
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            return Err(Self::status_error(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PorticoError::transport("failed to decode response body", e))
    }

    async fn status_error(response: Response) -> PorticoError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read error body>".to_string());
        PorticoError::http(body.trim().to_string(), status.as_u16())
    }
}

/// Rewrite a 404 from the store into a typed not-found for `id`
fn map_not_found(err: PorticoError, resource_type: &str, id: &str) -> PorticoError {
    match err {
        PorticoError::Http { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            PorticoError::not_found(resource_type, id)
        }
        other => other,
    }
}

/// Rewrite a 409 from the store into a typed already-exists for `name`
fn map_already_exists(err: PorticoError, resource_type: &str, name: &str) -> PorticoError {
    match err {
        PorticoError::Http { status, .. } if status == StatusCode::CONFLICT.as_u16() => {
            PorticoError::already_exists(resource_type, name)
        }
        other => other,
    }
}

#[async_trait]
impl ConfigStore for RestConfigStore {
    async fn list_upstreams(&self) -> Result<Vec<Upstream>> {
        self.get_json(UPSTREAMS_PATH).await
    }

    async fn get_upstream(&self, name: &str) -> Result<Upstream> {
        self.get_json(&format!("{}/{}", UPSTREAMS_PATH, name))
            .await
            .map_err(|e| map_not_found(e, "upstream", name))
    }

    async fn list_virtual_hosts(&self) -> Result<Vec<VirtualHost>> {
        self.get_json(VIRTUAL_HOSTS_PATH).await
    }

    async fn get_virtual_host(&self, name: &str) -> Result<VirtualHost> {
        self.get_json(&format!("{}/{}", VIRTUAL_HOSTS_PATH, name))
            .await
            .map_err(|e| map_not_found(e, "virtual host", name))
    }

    async fn create_virtual_host(&self, virtual_host: &VirtualHost) -> Result<VirtualHost> {
        self.post_json(VIRTUAL_HOSTS_PATH, virtual_host)
            .await
            .map_err(|e| map_already_exists(e, "virtual host", &virtual_host.name))
    }

    async fn update_virtual_host(&self, virtual_host: &VirtualHost) -> Result<VirtualHost> {
        self.put_json(&format!("{}/{}", VIRTUAL_HOSTS_PATH, virtual_host.name), virtual_host)
            .await
            .map_err(|e| map_not_found(e, "virtual host", &virtual_host.name))
    }

    async fn delete_virtual_host(&self, name: &str) -> Result<()> {
        self.delete(&format!("{}/{}", VIRTUAL_HOSTS_PATH, name))
            .await
            .map_err(|e| map_not_found(e, "virtual host", name))
    }
}
