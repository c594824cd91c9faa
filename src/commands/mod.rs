//! CLI command implementations.

pub mod scrape;
pub mod serve;

pub use scrape::ScrapeCommand;
pub use serve::ServeCommand;
