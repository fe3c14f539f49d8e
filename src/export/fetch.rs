//! Revision history download from the REST backend.

use anyhow::{Context, Result};
use reqwest::blocking::Client;

use super::record::Revision;
use crate::config::BeaconConfig;

/// Anything that can produce the revision history, newest first.
pub trait VersionSource {
    fn fetch_versions(&self) -> Result<Vec<Revision>>;
}

/// PostgREST-style endpoint (`/rest/v1/<table>`) authenticated with an API key.
pub struct RestSource {
    base_url: String,
    api_key: String,
    table: String,
    client: Client,
}

impl RestSource {
    pub fn new(base_url: &str, api_key: &str, table: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("beacon-devkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
            client,
        })
    }

    /// Build a source from the `[remote]` section.
    pub fn from_config(config: &BeaconConfig) -> Result<Self> {
        let (base_url, api_key) = config.remote_credentials()?;
        Self::new(base_url, api_key, &config.remote.table)
    }

    /// All rows, newest `updated_at` first.
    pub fn versions_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=updated_at.desc",
            self.base_url, self.table
        )
    }
}

impl VersionSource for RestSource {
    fn fetch_versions(&self) -> Result<Vec<Revision>> {
        let url = self.versions_url();
        log::debug!("GET {url}");

        let versions = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .with_context(|| format!("Request to {} failed", self.base_url))?
            .error_for_status()
            .context("Remote returned an error status")?
            .json::<Vec<Revision>>()
            .context("Failed to parse revision list")?;

        Ok(versions)
    }
}
