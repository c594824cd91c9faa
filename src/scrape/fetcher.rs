//! HTTP page fetching using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use wreq::Client;
use wreq_util::Emulation;

/// Fixed desktop browser User-Agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// A fetched page, whatever its status.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
}

impl FetchedPage {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for page retrieval - enables mocking for tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a URL and returns the body. Non-2xx statuses are not errors.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// HTTP client with browser impersonation.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a new fetcher from the configured proxy and timeouts.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        debug!("GET {}", url);
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Referer", "https://www.google.com/")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "cross-site")
            .header("DNT", "1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        let final_url = response.uri().to_string();
        debug!("Response status: {} ({}ms)", status, started.elapsed().as_millis());

        if !(200..300).contains(&status) {
            warn!("{} returned status {}; extracting from the body anyway", url, status);
        }

        let body = response.text().await.context("Failed to read response body")?;

        Ok(FetchedPage { url: final_url, status, body })
    }
}
