//! Extraction pipeline: HTTP fetching, HTML parsing, and listing records.

pub mod fetcher;
pub mod models;
pub mod parser;
pub mod pipeline;

pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use models::{ProductRecord, QueryEcho, ScrapeRequest, ScrapeResponse, ValidatedQuery};
pub use parser::{InclusionPolicy, ListingParser};
pub use pipeline::{ExtractOutcome, Extractor};
