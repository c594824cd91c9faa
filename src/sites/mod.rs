//! Site registry: per-site search URL builders and selector tables.

pub mod registry;
pub mod selectors;

pub use registry::{all, resolve, supported_sites, SiteProfile, UrlBuilder, DEFAULT_SITE};
pub use selectors::{CompiledSelectors, SelectorSet};
