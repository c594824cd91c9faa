//! Batch scrape command implementation.

use crate::config::Config;
use crate::format::Formatter;
use crate::scrape::{Extractor, HttpFetcher, PageFetcher, ScrapeRequest};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Executes one scrape from a request payload.
pub struct ScrapeCommand {
    config: Config,
}

impl ScrapeCommand {
    /// Creates a new scrape command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Reads a JSON request payload from a file, or from stdin when the path is `-`.
    pub fn read_payload(path: &Path) -> Result<ScrapeRequest> {
        let content = if path == Path::new("-") {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer).context("Failed to read payload from stdin")?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read payload file: {}", path.display()))?
        };

        Self::parse_payload(&content)
    }

    /// Parses a JSON request payload.
    pub fn parse_payload(content: &str) -> Result<ScrapeRequest> {
        serde_json::from_str(content).context("Invalid scrape payload")
    }

    /// Runs the scrape and returns formatted `{ query, results }` output.
    pub async fn execute(&self, request: ScrapeRequest) -> Result<String> {
        let fetcher = HttpFetcher::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_fetcher(Arc::new(fetcher), request).await
    }

    /// Runs the scrape with a provided fetcher (for testing).
    ///
    /// Invalid input aborts before any request is made.
    pub async fn execute_with_fetcher(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        mut request: ScrapeRequest,
    ) -> Result<String> {
        request.site.get_or_insert_with(|| self.config.site.clone());
        request.max_results.get_or_insert(self.config.max_results);
        debug!("Batch request: {:?}", request);

        let extractor = Extractor::new(fetcher).with_policy(self.config.inclusion);
        let response = extractor.scrape(&request).await.map_err(|e| match e.supported_sites() {
            Some(sites) => anyhow::anyhow!("{}. Supported sites: {}", e, sites.join(", ")),
            None => anyhow::Error::new(e),
        })?;

        info!("Scraped {} products", response.results.len());

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_response(&response))
    }
}
