//! # HTTP Client
//!
//! [`Fetcher`] is the seam between resources and the network. Production
//! code uses [`HttpFetcher`] (reqwest); tests plug in scripted fetchers.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{FetchError, FetchResult};

/// Performs a GET and returns the body of a successful response.
///
/// A response with a non-2xx status is an error, never a body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> FetchResult<String>;
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Settings for [`HttpFetcher`].
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use ecomlite_fetch::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("ecomlite-test");
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Whole-request timeout.
    pub timeout: Duration,

    /// Sent as the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            timeout: Duration::from_secs(30),
            user_agent: format!("ecomlite/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

// =============================================================================
// reqwest Implementation
// =============================================================================

/// [`Fetcher`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds the client.
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(HttpFetcher { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> FetchResult<String> {
        debug!(url = %url, "GET");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Request failed");
            return Err(FetchError::status(
                status.as_u16(),
                status.canonical_reason(),
            ));
        }

        let body = response.text().await?;
        debug!(url = %url, bytes = body.len(), "Response received");
        Ok(body)
    }
}
