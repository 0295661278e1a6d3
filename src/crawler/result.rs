//! Crawl result accumulation
//!
//! [`CrawlResult`] owns everything one crawl produced: a record per
//! successfully fetched page, in fetch order, plus an explicit entry for
//! every visited URL that was skipped and why.

use crate::crawler::extract::{PageAnalysis, PageRecord};
use crate::crawler::fetcher::FetchFailure;
use crate::url::normalize_url;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a visited URL produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The fetch failed (status, timeout, transport)
    Fetch(FetchFailure),

    /// The URL could not be parsed, so nothing was fetched
    InvalidUrl(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(failure) => write!(f, "{}", failure),
            Self::InvalidUrl(e) => write!(f, "Invalid URL: {}", e),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A successfully fetched and extracted page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawledPage {
    pub url: String,
    pub depth: u32,
    pub record: PageRecord,
}

/// A visited URL that produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPage {
    pub url: String,
    pub depth: u32,
    pub reason: SkipReason,
}

/// Everything one crawl invocation produced
///
/// Serializes as a JSON object mapping URL to page record; skipped pages
/// are available separately through [`CrawlResult::skipped`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pages: Vec<CrawledPage>,
    skipped: Vec<SkippedPage>,
}

impl CrawlResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_page(&mut self, url: &str, depth: u32, record: PageRecord) {
        self.pages.push(CrawledPage {
            url: url.to_string(),
            depth,
            record,
        });
    }

    pub(crate) fn record_skip(&mut self, url: &str, depth: u32, reason: SkipReason) {
        self.skipped.push(SkippedPage {
            url: url.to_string(),
            depth,
            reason,
        });
    }

    /// Number of pages with a record
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in the order they were fetched
    pub fn pages(&self) -> &[CrawledPage] {
        &self.pages
    }

    /// Visited URLs that produced no record
    pub fn skipped(&self) -> &[SkippedPage] {
        &self.skipped
    }

    /// Record for `url`, looked up by its normalized form
    ///
    /// `https://example.com` finds the page stored as `https://example.com/`.
    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        let key = normalize_url(url)
            .map(String::from)
            .unwrap_or_else(|_| url.to_string());
        self.pages
            .iter()
            .find(|page| page.url == key)
            .map(|page| &page.record)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    /// URLs with a record, in fetch order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }

    pub fn records(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter().map(|page| &page.record)
    }

    /// Analysis records only; empty unless the crawl ran in analysis mode
    pub fn analyses(&self) -> impl Iterator<Item = &PageAnalysis> {
        self.records().filter_map(PageRecord::as_analysis)
    }

    /// Total number of URLs visited (fetched or skipped)
    pub fn visited_count(&self) -> usize {
        self.pages.len() + self.skipped.len()
    }

    /// Materializes the URL → record mapping
    pub fn into_map(self) -> BTreeMap<String, PageRecord> {
        self.pages
            .into_iter()
            .map(|page| (page.url, page.record))
            .collect()
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pages.len()))?;
        for page in &self.pages {
            map.serialize_entry(&page.url, &page.record)?;
        }
        map.end()
    }
}
