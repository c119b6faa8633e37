//! Feed retrieval.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::Config;
use crate::constants::FEED_USER_AGENT;
use crate::model::{Post, PostsResponse};

/// Source of status posts. The poller depends only on this seam, so tests can
/// substitute scripted fetchers for the HTTP client.
#[async_trait]
pub trait PostFetcher: Send + Sync {
    /// Fetch the current post collection. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns a transport or decode failure, which the caller treats as "no
    /// data" — distinct from an empty `Ok`.
    async fn fetch_posts(&self) -> Result<Vec<Post>>;
}

/// `PostFetcher` over the service's JSON endpoint.
pub struct HttpPostFetcher {
    client: reqwest::Client,
    posts_url: String,
}

impl HttpPostFetcher {
    /// Build a fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            posts_url: config.posts_url(),
        })
    }
}

#[async_trait]
impl PostFetcher for HttpPostFetcher {
    async fn fetch_posts(&self) -> Result<Vec<Post>> {
        let response = self
            .client
            .get(&self.posts_url)
            .header("User-Agent", FEED_USER_AGENT)
            .send()
            .await
            .context("Failed to fetch post feed")?;

        if !response.status().is_success() {
            anyhow::bail!("Post feed fetch failed with status {}", response.status());
        }

        let body: PostsResponse = response
            .json()
            .await
            .context("Failed to decode post feed body")?;

        Ok(body.into_posts())
    }
}
