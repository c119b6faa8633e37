//! Hero image retrieval.
//!
//! Image paths in the feed are either fully qualified or relative to the
//! service origin. Every failure degrades to "no image" so the dashboard
//! leaves the slot blank instead of erroring.

use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::constants::FEED_USER_AGENT;

pub struct ImageFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl ImageFetcher {
    /// Build a fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is unparsable or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL: {}", config.base_url))?;
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    /// Retrieve raw image bytes for a feed image path, or `None` on any
    /// failure (empty path, bad URL, transport error, non-success status).
    pub async fn fetch(&self, path: &str) -> Option<Vec<u8>> {
        let url = self.resolve(path)?;
        match self.fetch_bytes(url.clone()).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!(url = %url, "Image fetch failed: {e:#}");
                None
            }
        }
    }

    /// Resolve a feed image path to an absolute URL. Paths already carrying a
    /// scheme pass through; anything else joins onto the base origin.
    fn resolve(&self, path: &str) -> Option<Url> {
        if path.is_empty() {
            return None;
        }
        if path.starts_with("http") {
            Url::parse(path).ok()
        } else {
            self.base_url.join(path).ok()
        }
    }

    async fn fetch_bytes(&self, url: Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", FEED_USER_AGENT)
            .send()
            .await
            .context("Failed to fetch image")?;

        if !response.status().is_success() {
            anyhow::bail!("Image fetch failed with status {}", response.status());
        }

        let bytes = response.bytes().await.context("Failed to read image body")?;
        Ok(bytes.to_vec())
    }
}
