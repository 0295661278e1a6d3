//! HTML link extraction
//!
//! Collects every anchor `href` in document order, resolves it against the
//! page URL, and keeps only links that pass the crawl's [`LinkFilter`].
//! Duplicates are kept; the frontier deduplicates at dequeue time.

use crate::url::{normalize_url, LinkFilter};
use scraper::{Html, Selector};
use url::Url;

/// Resolves every `<a href>` in the document against `base_url`
///
/// Returns absolute URLs in document order. Hrefs that cannot be resolved
/// are dropped; no scheme or host filtering happens here.
pub fn resolve_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| base_url.join(href.trim()).ok())
        .collect()
}

/// Extracts the crawlable links from an HTML page
///
/// # Link Rules
///
/// A link is kept iff:
/// - its scheme is `http` or `https`
/// - its host equals the start host exactly (no subdomains)
/// - its path contains none of the resource extensions
///
/// Kept links are returned normalized, so they compare equal to visited-set
/// keys. Invalid links are dropped silently.
///
/// # Example
///
/// ```
/// use page_harvest::crawler::extract_links;
/// use page_harvest::url::LinkFilter;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.com/">Other</a>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let filter = LinkFilter::for_start_url(&base);
/// assert_eq!(extract_links(html, &base, &filter), vec!["https://example.com/about"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, filter: &LinkFilter) -> Vec<String> {
    let document = Html::parse_document(html);
    extract_links_from_document(&document, base_url, filter)
}

pub(crate) fn extract_links_from_document(
    document: &Html,
    base_url: &Url,
    filter: &LinkFilter,
) -> Vec<String> {
    resolve_links(document, base_url)
        .into_iter()
        .filter(|link| {
            let keep = filter.is_valid(link);
            if !keep {
                tracing::trace!("Dropping link {}", link);
            }
            keep
        })
        .filter_map(|link| normalize_url(link.as_str()).ok())
        .map(String::from)
        .collect()
}
