//! Request, response and listing record types.

use crate::error::ScrapeError;
use crate::sites::DEFAULT_SITE;
use serde::{Deserialize, Serialize};

/// Placeholder used when a card has no price element.
pub const PRICE_NOT_AVAILABLE: &str = "Price not available";
/// Placeholder used when a card has no rating element.
pub const NO_RATING: &str = "No rating";
/// Placeholder used when a card has no image element.
pub const NO_IMAGE: &str = "No image";

/// Result cap applied when the caller does not send one.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// One extracted search listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Listing title; empty when not found
    pub title: String,
    /// Price text or [`PRICE_NOT_AVAILABLE`]
    pub price: String,
    /// Rating text or [`NO_RATING`]
    pub rating: String,
    /// Image source URL or [`NO_IMAGE`]
    pub image: String,
    /// Absolute listing URL, `None` when missing or unresolvable
    pub link: Option<String>,
    /// Site identifier the record came from
    pub source: String,
}

impl ProductRecord {
    /// Returns true when both a title and a link were extracted.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && self.link.is_some()
    }

    /// Returns true if a real price was found.
    pub fn has_price(&self) -> bool {
        self.price != PRICE_NOT_AVAILABLE
    }

    /// Returns true if a real rating was found.
    pub fn has_rating(&self) -> bool {
        self.rating != NO_RATING
    }
}

/// Caller input, shared by the HTTP endpoint and the batch command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

impl ScrapeRequest {
    /// Creates a request for a product name with default site and cap.
    pub fn new(product_name: impl Into<String>) -> Self {
        Self { product_name: Some(product_name.into()), ..Self::default() }
    }

    /// Checks the query terms and fills in defaults.
    ///
    /// Whitespace-only terms count as missing. The site is not resolved here.
    pub fn validate(&self) -> Result<ValidatedQuery, ScrapeError> {
        let product_name = present(self.product_name.as_deref());
        let category = present(self.category.as_deref());

        if product_name.is_none() && category.is_none() {
            return Err(ScrapeError::MissingQuery);
        }

        Ok(ValidatedQuery {
            product_name: product_name.unwrap_or_default().to_string(),
            category: category.map(String::from),
            site: self.site.clone().unwrap_or_else(|| DEFAULT_SITE.to_string()),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    /// Search term, empty when only a category was given
    pub product_name: String,
    pub category: Option<String>,
    /// Site identifier as the caller sent it
    pub site: String,
    pub max_results: usize,
}

/// Echo of the request, returned alongside the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEcho {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub site: String,
}

impl From<&ScrapeRequest> for QueryEcho {
    fn from(request: &ScrapeRequest) -> Self {
        Self {
            product_name: request.product_name.clone(),
            category: request.category.clone(),
            site: request.site.clone().unwrap_or_else(|| DEFAULT_SITE.to_string()),
        }
    }
}

/// Success payload: `{ query, results }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub query: QueryEcho,
    pub results: Vec<ProductRecord>,
}
