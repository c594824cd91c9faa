//! shop-scraper - Stateless e-commerce search-result scraper
//!
//! Fetches a site's search page with a browser-like request, applies the
//! site's selector table and returns normalised listing records, either over
//! an HTTP endpoint or as a one-shot batch command.

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod scrape;
pub mod server;
pub mod sites;

pub use config::Config;
pub use error::ScrapeError;
pub use scrape::{ExtractOutcome, Extractor, ProductRecord, ScrapeRequest, ScrapeResponse};
pub use sites::SiteProfile;
