//! Extraction pipeline: build URL, fetch, parse, normalise.

use crate::error::ScrapeError;
use crate::scrape::fetcher::PageFetcher;
use crate::scrape::models::{ProductRecord, QueryEcho, ScrapeRequest, ScrapeResponse, ValidatedQuery};
use crate::scrape::parser::{InclusionPolicy, ListingParser};
use crate::sites::{self, SiteProfile};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// What a single extraction produced.
///
/// Distinguishes a page with zero matches from a page that could not be
/// fetched or parsed.
#[derive(Debug, Clone)]
pub enum ExtractOutcome {
    Extracted {
        /// Search URL that was requested
        url: String,
        /// HTTP status of the response
        status: u16,
        /// Containers on the page before the cap
        containers_found: usize,
        records: Vec<ProductRecord>,
    },
    Failed {
        url: String,
        reason: String,
    },
}

impl ExtractOutcome {
    /// Records extracted, empty on failure.
    pub fn records(&self) -> &[ProductRecord] {
        match self {
            ExtractOutcome::Extracted { records, .. } => records,
            ExtractOutcome::Failed { .. } => &[],
        }
    }

    /// Consumes the outcome into the best-effort record list.
    pub fn into_records(self) -> Vec<ProductRecord> {
        match self {
            ExtractOutcome::Extracted { records, .. } => records,
            ExtractOutcome::Failed { .. } => Vec::new(),
        }
    }

    /// The search URL this outcome belongs to.
    pub fn url(&self) -> &str {
        match self {
            ExtractOutcome::Extracted { url, .. } | ExtractOutcome::Failed { url, .. } => url,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractOutcome::Failed { .. })
    }
}

/// Runs searches against registered sites.
#[derive(Clone)]
pub struct Extractor {
    fetcher: Arc<dyn PageFetcher>,
    policy: InclusionPolicy,
}

impl Extractor {
    /// Creates an extractor over the given fetcher.
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher, policy: InclusionPolicy::default() }
    }

    /// Sets the inclusion policy applied to extracted records.
    pub fn with_policy(mut self, policy: InclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates a request, resolves its site and extracts listings.
    ///
    /// Only invalid input is an error; fetch and parse faults come back as an
    /// empty result list.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse, ScrapeError> {
        let query = request.validate()?;
        let profile = sites::resolve(&query.site)?;

        let outcome = self.extract(profile, &query).await;

        Ok(ScrapeResponse { query: QueryEcho::from(request), results: outcome.into_records() })
    }

    /// Extracts up to `query.max_results` listings from one site. Never fails;
    /// faults are logged and reported as [`ExtractOutcome::Failed`].
    pub async fn extract(&self, profile: &SiteProfile, query: &ValidatedQuery) -> ExtractOutcome {
        let url = profile.search_url(&query.product_name, query.category.as_deref());
        debug!("Scraping URL: {}", url);

        let selectors = match profile.selectors.compile() {
            Ok(selectors) => selectors,
            Err(e) => return failed(query, url, e.to_string()),
        };

        let started = Instant::now();
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => return failed(query, url, format!("{:#}", e)),
        };
        debug!("Request took {}ms", started.elapsed().as_millis());

        let listings = ListingParser::new(profile.id, &selectors, profile.base_origin, &url)
            .with_policy(self.policy)
            .parse(&page.body, query.max_results);

        info!(
            "Extracted {} of {} listings from {} for '{}'",
            listings.records.len(),
            listings.containers_found,
            profile.id,
            describe(query)
        );

        ExtractOutcome::Extracted {
            url,
            status: page.status,
            containers_found: listings.containers_found,
            records: listings.records,
        }
    }
}

fn failed(query: &ValidatedQuery, url: String, reason: String) -> ExtractOutcome {
    error!("Scrape error for '{}' at {}: {}", describe(query), url, reason);
    ExtractOutcome::Failed { url, reason }
}

fn describe(query: &ValidatedQuery) -> String {
    match &query.category {
        Some(category) if query.product_name.is_empty() => format!("[{}]", category),
        Some(category) => format!("{} [{}]", query.product_name, category),
        None => query.product_name.clone(),
    }
}
