//! Caller-visible error taxonomy.

use thiserror::Error;

/// Errors surfaced to callers of the scraper.
///
/// Transport and parse faults below the validation layer never show up here;
/// they are absorbed by the pipeline into an [`ExtractOutcome::Failed`].
///
/// [`ExtractOutcome::Failed`]: crate::scrape::ExtractOutcome::Failed
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Neither a product name nor a category was supplied.
    #[error("Please provide either a product name or category")]
    MissingQuery,

    /// The requested site is not in the registry.
    #[error("Unsupported site: {site}")]
    UnsupportedSite { site: String, supported: Vec<&'static str> },

    /// A site profile carries a selector that does not parse.
    #[error("Invalid {field} selector '{expression}': {message}")]
    InvalidSelector { field: &'static str, expression: &'static str, message: String },

    /// Anything else that went wrong while serving a request.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ScrapeError {
    /// Returns true for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScrapeError::MissingQuery | ScrapeError::UnsupportedSite { .. })
    }

    /// Supported site identifiers, when the error is about an unknown site.
    pub fn supported_sites(&self) -> Option<&[&'static str]> {
        match self {
            ScrapeError::UnsupportedSite { supported, .. } => Some(supported),
            _ => None,
        }
    }
}
