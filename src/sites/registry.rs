//! Built-in site profiles and lookup.

use crate::error::ScrapeError;
use crate::sites::selectors::SelectorSet;
use std::fmt;
use urlencoding::encode;

/// Builds a search URL from a product name and an optional category.
pub type UrlBuilder = fn(&str, Option<&str>) -> String;

/// Everything needed to scrape one site's search results.
#[derive(Clone, Copy)]
pub struct SiteProfile {
    /// Lower-case identifier used in requests and on records.
    pub id: &'static str,
    /// Search URL builder.
    pub url_builder: UrlBuilder,
    /// Structural locators for the listing fields.
    pub selectors: SelectorSet,
    /// Origin that relative links are resolved against.
    pub base_origin: &'static str,
}

impl SiteProfile {
    /// Returns the search URL for the given terms.
    pub fn search_url(&self, product: &str, category: Option<&str>) -> String {
        (self.url_builder)(product, category)
    }
}

impl fmt::Debug for SiteProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteProfile")
            .field("id", &self.id)
            .field("selectors", &self.selectors)
            .field("base_origin", &self.base_origin)
            .finish_non_exhaustive()
    }
}

/// Site used when a request does not name one.
pub const DEFAULT_SITE: &str = "amazon";

static SITES: &[SiteProfile] = &[
    SiteProfile {
        id: "amazon",
        url_builder: amazon_search_url,
        selectors: SelectorSet {
            products: "div.s-result-item[data-component-type='s-search-result']",
            title: "h2.a-size-medium span",
            price: ".a-price:not(.a-text-price) .a-offscreen",
            rating: "i.a-icon-star-small span.a-icon-alt",
            image: "img.s-image",
            link: "h2 a.a-link-normal",
        },
        base_origin: "https://www.amazon.com",
    },
    SiteProfile {
        id: "shopee",
        url_builder: shopee_search_url,
        selectors: SelectorSet {
            products: "li.shopee-search-item-result__item",
            title: "div.line-clamp-2",
            price: "span.font-medium.truncate",
            rating: "div.text-shopee-black87.flex-none",
            image: "img.object-contain",
            link: "a[href]",
        },
        base_origin: "https://shopee.com.my",
    },
];

fn amazon_search_url(product: &str, category: Option<&str>) -> String {
    let mut url = format!("https://www.amazon.com/s?k={}", encode(product));
    if let Some(category) = non_empty(category) {
        url.push_str("&i=");
        url.push_str(&encode(category));
    }
    url
}

fn shopee_search_url(product: &str, category: Option<&str>) -> String {
    let mut url = format!("https://shopee.com.my/search?keyword={}", encode(product));
    if let Some(category) = non_empty(category) {
        url.push_str("&categories=");
        url.push_str(&encode(category));
    }
    url
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Returns every registered profile in registry order.
pub fn all() -> &'static [SiteProfile] {
    SITES
}

/// Returns the registered identifiers in registry order.
pub fn supported_sites() -> Vec<&'static str> {
    SITES.iter().map(|site| site.id).collect()
}

/// Looks up a profile by identifier, ignoring case and surrounding whitespace.
pub fn resolve(site_id: &str) -> Result<&'static SiteProfile, ScrapeError> {
    let wanted = site_id.trim().to_lowercase();
    SITES.iter().find(|site| site.id == wanted).ok_or_else(|| ScrapeError::UnsupportedSite {
        site: site_id.to_string(),
        supported: supported_sites(),
    })
}
