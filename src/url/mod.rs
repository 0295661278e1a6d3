//! URL handling module for Page-Harvest
//!
//! This module provides URL normalization for visited-set keys, host
//! extraction, scheme defaulting, and the same-domain/resource link filter.

mod domain;
mod filter;
mod normalize;

pub use domain::extract_host;
pub use filter::{is_resource_path, LinkFilter, RESOURCE_EXTENSIONS};
pub use normalize::normalize_url;

/// Prefixes `https://` onto input that carries no HTTP(S) scheme
///
/// This is the caller-side defaulting applied before a crawl starts; the
/// crawler itself does not rewrite URLs it is given.
///
/// # Examples
///
/// ```
/// use page_harvest::url::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com"), "https://example.com");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
