//! CSS selector tables for listing extraction.
//!
//! Each site profile carries one [`SelectorSet`] of raw expressions. They are
//! compiled into [`CompiledSelectors`] right before a page is parsed.
//!
//! **Update process**: when a site changes its markup, capture an HTML sample,
//! update the expressions in `registry.rs`, and add a test fixture.

use crate::error::ScrapeError;
use scraper::Selector;

/// Raw selector expressions locating the six listing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectorSet {
    /// Product card container - one per search result.
    pub products: &'static str,
    /// Title text, scoped to a card.
    pub title: &'static str,
    /// Price text, scoped to a card.
    pub price: &'static str,
    /// Rating text, scoped to a card.
    pub rating: &'static str,
    /// Image element; its `src` attribute is read.
    pub image: &'static str,
    /// Link element; its `href` attribute is read.
    pub link: &'static str,
}

impl SelectorSet {
    /// Parses every expression, reporting the first one that fails.
    pub fn compile(&self) -> Result<CompiledSelectors, ScrapeError> {
        Ok(CompiledSelectors {
            products: parse("products", self.products)?,
            title: parse("title", self.title)?,
            price: parse("price", self.price)?,
            rating: parse("rating", self.rating)?,
            image: parse("image", self.image)?,
            link: parse("link", self.link)?,
        })
    }
}

/// Parsed selectors ready to run against a document.
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub products: Selector,
    pub title: Selector,
    pub price: Selector,
    pub rating: Selector,
    pub image: Selector,
    pub link: Selector,
}

fn parse(field: &'static str, expression: &'static str) -> Result<Selector, ScrapeError> {
    Selector::parse(expression).map_err(|e| ScrapeError::InvalidSelector {
        field,
        expression,
        message: e.to_string(),
    })
}

/// Attribute read from the image element.
pub const IMAGE_ATTR: &str = "src";

/// Attribute read from the link element.
pub const LINK_ATTR: &str = "href";

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: SelectorSet = SelectorSet {
        products: "div.item",
        title: "h2",
        price: ".price",
        rating: ".stars",
        image: "img",
        link: "a",
    };

    #[test]
    fn test_compile_valid_set() {
        assert!(VALID.compile().is_ok());
    }

    #[test]
    fn test_compile_reports_broken_field() {
        let broken = SelectorSet { price: "span[", ..VALID };
        let err = broken.compile().unwrap_err();
        match err {
            ScrapeError::InvalidSelector { field, expression, .. } => {
                assert_eq!(field, "price");
                assert_eq!(expression, "span[");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_compile_error_message() {
        let broken = SelectorSet { link: "", ..VALID };
        let message = broken.compile().unwrap_err().to_string();
        assert!(message.starts_with("Invalid link selector"));
    }
}
