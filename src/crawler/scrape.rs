//! Single-page scraping with a user-supplied pattern
//!
//! The pattern is first tried as a CSS selector; if it is not a valid
//! selector, or selects nothing, it is applied as a regular expression to
//! the raw HTML instead.

use crate::crawler::fetcher::{fetch_page, FetchOutcome};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;

/// Characters of raw HTML echoed back in a scrape outcome
pub const CONTENT_PREVIEW_CHARS: usize = 1000;

/// Result of scraping one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeOutcome {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extracted_data: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub success: bool,
}

impl ScrapeOutcome {
    fn failed(url: &str, error: String) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            content: None,
            extracted_data: Vec::new(),
            error: Some(error),
            success: false,
        }
    }
}

/// Fetches `url` and extracts `pattern` matches from it
///
/// Fetch failures are reported inside the outcome, never as an error.
pub async fn scrape_page(client: &Client, url: &str, pattern: Option<&str>) -> ScrapeOutcome {
    let body = match fetch_page(client, url).await {
        FetchOutcome::Success { body, .. } => body,
        FetchOutcome::Failure(failure) => return ScrapeOutcome::failed(url, failure.to_string()),
    };

    let document = Html::parse_document(&body);
    let title = Selector::parse("title")
        .ok()
        .and_then(|s| {
            document
                .select(&s)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
        })
        .filter(|t| !t.is_empty());

    let extracted_data = match pattern {
        Some(pattern) => extract_pattern(&document, &body, pattern),
        None => Vec::new(),
    };

    ScrapeOutcome {
        url: url.to_string(),
        title,
        content: Some(preview(&body)),
        extracted_data,
        error: None,
        success: true,
    }
}

/// Applies `pattern` as a CSS selector, falling back to a regex over `html`
pub fn extract_pattern(document: &Html, html: &str, pattern: &str) -> Vec<String> {
    if let Ok(selector) = Selector::parse(pattern) {
        let texts: Vec<String> = document
            .select(&selector)
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        if !texts.is_empty() {
            return texts;
        }
    }

    match Regex::new(pattern) {
        Ok(regex) => regex
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(0)))
            .map(|m| m.as_str().to_string())
            .filter(|m| !m.is_empty())
            .collect(),
        Err(e) => {
            tracing::warn!("Pattern '{}' is neither a selector nor a regex: {}", pattern, e);
            Vec::new()
        }
    }
}

/// First [`CONTENT_PREVIEW_CHARS`] characters, with `...` when cut
fn preview(body: &str) -> String {
    match body.char_indices().nth(CONTENT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
