//! HTML parser turning search result pages into listing records.

use crate::scrape::models::{ProductRecord, NO_IMAGE, NO_RATING, PRICE_NOT_AVAILABLE};
use crate::sites::selectors::{CompiledSelectors, IMAGE_ATTR, LINK_ATTR};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace, warn};
use url::Url;

/// Decides which extracted records are returned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InclusionPolicy {
    /// Return every card, even without a title or link.
    #[default]
    KeepAll,
    /// Drop cards missing a title or a resolvable link.
    RequireTitleAndLink,
}

impl InclusionPolicy {
    fn admits(&self, record: &ProductRecord) -> bool {
        match self {
            InclusionPolicy::KeepAll => true,
            InclusionPolicy::RequireTitleAndLink => record.is_complete(),
        }
    }
}

impl FromStr for InclusionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "keep_all" | "all" => Ok(InclusionPolicy::KeepAll),
            "require_title_and_link" | "complete" => Ok(InclusionPolicy::RequireTitleAndLink),
            _ => Err(format!(
                "Unknown inclusion policy: {}. Use: keep-all, require-title-and-link",
                s
            )),
        }
    }
}

impl fmt::Display for InclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InclusionPolicy::KeepAll => write!(f, "keep-all"),
            InclusionPolicy::RequireTitleAndLink => write!(f, "require-title-and-link"),
        }
    }
}

/// Records pulled from one page.
#[derive(Debug, Clone, Default)]
pub struct ParsedListings {
    /// Containers matched on the page before the cap was applied
    pub containers_found: usize,
    pub records: Vec<ProductRecord>,
}

/// Applies one site's selectors to search result pages.
pub struct ListingParser<'a> {
    source: &'a str,
    selectors: &'a CompiledSelectors,
    base_origin: &'a str,
    page_url: &'a str,
    policy: InclusionPolicy,
}

impl<'a> ListingParser<'a> {
    /// Creates a parser tagging records with `source`.
    ///
    /// Relative links resolve against `base_origin`, or against `page_url`
    /// when the origin does not parse.
    pub fn new(
        source: &'a str,
        selectors: &'a CompiledSelectors,
        base_origin: &'a str,
        page_url: &'a str,
    ) -> Self {
        Self { source, selectors, base_origin, page_url, policy: InclusionPolicy::default() }
    }

    /// Sets the inclusion policy.
    pub fn with_policy(mut self, policy: InclusionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Extracts at most `max_results` records in document order.
    pub fn parse(&self, html: &str, max_results: usize) -> ParsedListings {
        let document = Html::parse_document(html);

        let containers: Vec<ElementRef> = document.select(&self.selectors.products).collect();
        debug!("Found {} product containers", containers.len());

        let mut records = Vec::with_capacity(containers.len().min(max_results));
        for (index, element) in containers.iter().take(max_results).enumerate() {
            let record = self.parse_card(*element);
            trace!("Product {}: {} ({:?})", index + 1, record.title, record.link);

            if self.policy.admits(&record) {
                records.push(record);
            } else {
                debug!("Skipping incomplete product {} under {}", index + 1, self.policy);
            }
        }

        ParsedListings { containers_found: containers.len(), records }
    }

    /// Maps a single container to a record. Missing fields fall back to
    /// placeholders and never affect neighbouring cards.
    fn parse_card(&self, element: ElementRef) -> ProductRecord {
        let title = first_text(element, &self.selectors.title).unwrap_or_default();

        let price = first_text(element, &self.selectors.price)
            .unwrap_or_else(|| PRICE_NOT_AVAILABLE.to_string());

        let rating =
            first_text(element, &self.selectors.rating).unwrap_or_else(|| NO_RATING.to_string());

        let image = first_attr(element, &self.selectors.image, IMAGE_ATTR)
            .unwrap_or_else(|| NO_IMAGE.to_string());

        let link = first_attr(element, &self.selectors.link, LINK_ATTR)
            .and_then(|href| resolve_link(&href, self.base_origin, self.page_url));

        ProductRecord { title, price, rating, image, link, source: self.source.to_string() }
    }
}

/// Text of the first match, whitespace-collapsed. Empty text counts as absent.
fn first_text(element: ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|e| e.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
}

/// Trimmed attribute of the first match. Empty values count as absent.
fn first_attr(element: ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

/// Turns an `href` into an absolute URL.
///
/// Absolute values pass through untouched. Relative ones are joined onto
/// `base_origin`, or onto `page_url` if the origin does not parse. Returns
/// `None` when the join fails.
pub fn resolve_link(href: &str, base_origin: &str, page_url: &str) -> Option<String> {
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }

    let base = Url::parse(base_origin).or_else(|_| Url::parse(page_url));

    match base.and_then(|base| base.join(href)) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            warn!("Error constructing URL from '{}': {}", href, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::SelectorSet;

    const BASE: &str = "https://shop.example";
    const PAGE: &str = "https://shop.example/search?q=shoes";

    fn selectors() -> CompiledSelectors {
        SelectorSet {
            products: "div.item",
            title: "h2 span",
            price: ".price",
            rating: ".stars",
            image: "img.thumb",
            link: "h2 a",
        }
        .compile()
        .unwrap()
    }

    fn card(title: &str, href: &str) -> String {
        format!(
            r#"<div class="item">
                <h2><a href="{href}"><span>{title}</span></a></h2>
                <span class="price">$10.00</span>
                <span class="stars">4.0 out of 5 stars</span>
                <img class="thumb" src="https://img.example/{title}.jpg">
            </div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body>{}</body></html>", cards.concat())
    }

    // Link resolution

    #[test]
    fn test_resolve_relative_link() {
        assert_eq!(resolve_link("/x/y", BASE, PAGE), Some("https://shop.example/x/y".to_string()));
    }

    #[test]
    fn test_resolve_absolute_link_unchanged() {
        assert_eq!(resolve_link("https://a.b/c", BASE, PAGE), Some("https://a.b/c".to_string()));
    }

    #[test]
    fn test_resolve_falls_back_to_page_url() {
        assert_eq!(
            resolve_link("item/1", "", PAGE),
            Some("https://shop.example/item/1".to_string())
        );
    }

    #[test]
    fn test_resolve_malformed_link() {
        assert_eq!(resolve_link("http://[::1", BASE, PAGE), None);
        assert_eq!(resolve_link("/x", "", "not a url"), None);
    }

    // Card extraction

    #[test]
    fn test_parse_full_card() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let listings = parser.parse(&page(&[card("Runner", "/dp/1")]), 10);

        assert_eq!(listings.containers_found, 1);
        let record = &listings.records[0];
        assert_eq!(record.title, "Runner");
        assert_eq!(record.price, "$10.00");
        assert_eq!(record.rating, "4.0 out of 5 stars");
        assert_eq!(record.image, "https://img.example/Runner.jpg");
        assert_eq!(record.link.as_deref(), Some("https://shop.example/dp/1"));
        assert_eq!(record.source, "demo");
    }

    #[test]
    fn test_parse_missing_fields_use_placeholders() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let html = r#"<div class="item"><h2><span>Bare</span></h2></div>"#;
        let record = &parser.parse(html, 10).records[0];

        assert_eq!(record.title, "Bare");
        assert_eq!(record.price, PRICE_NOT_AVAILABLE);
        assert_eq!(record.rating, NO_RATING);
        assert_eq!(record.image, NO_IMAGE);
        assert_eq!(record.link, None);
    }

    #[test]
    fn test_parse_empty_values_count_as_missing() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let html = r#"<div class="item">
            <h2><a href=""><span>  </span></a></h2>
            <span class="price">   </span>
            <img class="thumb" src="">
        </div>"#;
        let record = &parser.parse(html, 10).records[0];

        assert_eq!(record.title, "");
        assert_eq!(record.price, PRICE_NOT_AVAILABLE);
        assert_eq!(record.image, NO_IMAGE);
        assert_eq!(record.link, None);
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let html = r#"<div class="item"><h2><span>
            Wireless
              Mouse  </span></h2></div>"#;
        assert_eq!(parser.parse(html, 10).records[0].title, "Wireless Mouse");
    }

    #[test]
    fn test_parse_uses_first_match_only() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let html = r#"<div class="item">
            <span class="price">$5.00</span><span class="price">$9.00</span>
        </div>"#;
        assert_eq!(parser.parse(html, 10).records[0].price, "$5.00");
    }

    #[test]
    fn test_fields_are_scoped_to_their_card() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let html = format!(
            r#"{}<div class="item"><h2><span>No price here</span></h2></div>"#,
            card("Priced", "/dp/1")
        );
        let records = parser.parse(&html, 10).records;
        assert_eq!(records[0].price, "$10.00");
        assert_eq!(records[1].price, PRICE_NOT_AVAILABLE);
    }

    // Truncation and ordering

    #[test]
    fn test_parse_caps_results_in_document_order() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let cards: Vec<String> = (1..=5).map(|i| card(&format!("P{i}"), &format!("/dp/{i}"))).collect();
        let listings = parser.parse(&page(&cards), 3);

        assert_eq!(listings.containers_found, 5);
        let titles: Vec<&str> = listings.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_parse_fewer_containers_than_cap() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let cards = vec![card("A", "/a"), card("B", "/b")];
        assert_eq!(parser.parse(&page(&cards), 10).records.len(), 2);
    }

    #[test]
    fn test_parse_zero_cap() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let listings = parser.parse(&page(&[card("A", "/a")]), 0);
        assert_eq!(listings.containers_found, 1);
        assert!(listings.records.is_empty());
    }

    #[test]
    fn test_parse_no_containers() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let listings = parser.parse("<html><body><p>Nothing</p></body></html>", 10);
        assert_eq!(listings.containers_found, 0);
        assert!(listings.records.is_empty());
    }

    #[test]
    fn test_parse_garbage_input() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        assert!(parser.parse("<<<not html at all", 10).records.is_empty());
        assert!(parser.parse("", 10).records.is_empty());
    }

    // Inclusion policy

    #[test]
    fn test_keep_all_retains_incomplete_records() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE);
        let html = page(&[card("A", "/a"), r#"<div class="item"></div>"#.to_string()]);
        assert_eq!(parser.parse(&html, 10).records.len(), 2);
    }

    #[test]
    fn test_require_title_and_link_drops_incomplete_records() {
        let selectors = selectors();
        let parser = ListingParser::new("demo", &selectors, BASE, PAGE)
            .with_policy(InclusionPolicy::RequireTitleAndLink);
        let html = page(&[
            r#"<div class="item"><h2><span>No link</span></h2></div>"#.to_string(),
            card("Complete", "/c"),
            r#"<div class="item"><h2><a href="/x"></a></h2></div>"#.to_string(),
        ]);
        let listings = parser.parse(&html, 10);
        assert_eq!(listings.containers_found, 3);
        assert_eq!(listings.records.len(), 1);
        assert_eq!(listings.records[0].title, "Complete");
    }

    #[test]
    fn test_inclusion_policy_parsing() {
        assert_eq!("keep-all".parse::<InclusionPolicy>().unwrap(), InclusionPolicy::KeepAll);
        assert_eq!("KEEP_ALL".parse::<InclusionPolicy>().unwrap(), InclusionPolicy::KeepAll);
        assert_eq!(
            "require-title-and-link".parse::<InclusionPolicy>().unwrap(),
            InclusionPolicy::RequireTitleAndLink
        );
        assert_eq!("complete".parse::<InclusionPolicy>().unwrap(), InclusionPolicy::RequireTitleAndLink);

        let err = "strict".parse::<InclusionPolicy>().unwrap_err();
        assert!(err.contains("Unknown inclusion policy"));
    }

    #[test]
    fn test_inclusion_policy_display_roundtrip() {
        for policy in [InclusionPolicy::KeepAll, InclusionPolicy::RequireTitleAndLink] {
            assert_eq!(policy.to_string().parse::<InclusionPolicy>().unwrap(), policy);
        }
    }
}
