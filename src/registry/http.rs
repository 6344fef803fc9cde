//! HTTP registry client.
//!
//! Fetches the package document at `{registry}/{name}` and reads the keys of
//! its `versions` object.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Result, StencilError};

use super::VersionSource;

/// Version source backed by an npm-compatible HTTP registry.
pub struct HttpRegistry {
    client: Client,
    timeout: Duration,
}

/// The part of a package document we read.
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(default)]
    versions: BTreeMap<String, serde_json::Value>,
}

impl HttpRegistry {
    /// Create a client with the default 30-second timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("stencil/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(anyhow::Error::from)?;

        Ok(Self { client, timeout })
    }

    /// Get the configured timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// URL of the package document for `name`.
    pub fn package_url(registry: &str, name: &str) -> String {
        format!("{}/{}", registry.trim_end_matches('/'), name)
    }
}

impl VersionSource for HttpRegistry {
    fn versions(&self, name: &str, registry: &str) -> Result<Vec<String>> {
        let url = Self::package_url(registry, name);
        tracing::debug!("Fetching versions of {} from {}", name, url);

        let unavailable = |message: String| StencilError::RegistryUnavailable {
            name: name.to_string(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {} fetching {}", response.status(), url)));
        }

        let document: PackageDocument = response
            .json()
            .map_err(|e| unavailable(format!("malformed package document: {}", e)))?;

        Ok(document.versions.into_keys().collect())
    }
}
