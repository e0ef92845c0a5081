//! HTTP client configuration.

use reqwest::Client;
use std::time::Duration;

/// Configuration for fetching from an upstream source.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Connection timeout (separate from the request timeout).
    pub connect_timeout: Duration,
    /// Pause between successive backfill pages, to stay under the source's
    /// rate limit.
    pub pause: Duration,
    /// Maximum number of backfill pages per run. Explicit bound on the
    /// pagination loop.
    pub max_pages: u32,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pause: Duration::from_millis(2_000),
            max_pages: 120,
            user_agent: format!("pricetape/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be constructed.
    pub fn build(&self) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
    }
}
