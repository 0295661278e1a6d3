//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with typed failure outcomes
//! - HTML link extraction and same-domain filtering
//! - Per-page data extraction in one of several modes
//! - Breadth-first frontier management
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod parser;
mod result;
mod scheduler;
mod scrape;

pub use coordinator::{crawl, Crawler};
pub use extract::{
    extract, visible_text_blocks, ExtractionMode, ImageEntry, LinkEntry, Metadata, PageAnalysis,
    PageRecord, MAX_PARAGRAPHS,
};
pub use fetcher::{build_http_client, fetch_page, FetchFailure, FetchOutcome};
pub use parser::{extract_links, resolve_links};
pub use result::{CrawlResult, CrawledPage, SkipReason, SkippedPage};
pub use scheduler::{CrawlTask, Frontier};
pub use scrape::{extract_pattern, scrape_page, ScrapeOutcome, CONTENT_PREVIEW_CHARS};
