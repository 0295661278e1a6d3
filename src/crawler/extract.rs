//! Per-page data extraction
//!
//! One [`ExtractionMode`] is chosen per crawl and every fetched page is turned
//! into a [`PageRecord`] of the matching shape. Extraction never fails: a
//! missing title or description degrades to an empty value.

use crate::ConfigError;
use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of paragraphs kept in an analysis record
pub const MAX_PARAGRAPHS: usize = 5;

/// What to pull out of each page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Every anchor as `{text, url}`, href unresolved
    Links,
    /// Every image with a `src` as `{alt, src}`
    Images,
    /// Visible text, one block per line
    Text,
    /// Title, description and keywords
    Metadata,
    /// General page analysis used for statistics and CSV export
    Analysis,
}

impl ExtractionMode {
    pub const ALL: [ExtractionMode; 5] = [
        Self::Links,
        Self::Images,
        Self::Text,
        Self::Metadata,
        Self::Analysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Links => "links",
            Self::Images => "images",
            Self::Text => "text",
            Self::Metadata => "metadata",
            Self::Analysis => "analysis",
        }
    }
}

impl FromStr for ExtractionMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| ConfigError::InvalidMode(s.to_string()))
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One anchor found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub text: String,
    pub url: String,
}

/// One image found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    pub alt: String,
    pub src: String,
}

/// Document metadata; absent tags are omitted, not emptied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

/// General-purpose analysis of one page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageAnalysis {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub word_count: usize,
    pub image_count: usize,
    pub link_count: usize,
    pub h1_tags: Vec<String>,
    pub paragraphs: Vec<String>,
}

/// Extraction output for one URL
///
/// Serializes to the bare mode-specific shape, e.g. `{"links": [...]}` or
/// `{"metadata": {"title": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageRecord {
    Links { links: Vec<LinkEntry> },
    Images { images: Vec<ImageEntry> },
    Text { text: String },
    Metadata { metadata: Metadata },
    Analysis(PageAnalysis),
}

impl PageRecord {
    pub fn mode(&self) -> ExtractionMode {
        match self {
            Self::Links { .. } => ExtractionMode::Links,
            Self::Images { .. } => ExtractionMode::Images,
            Self::Text { .. } => ExtractionMode::Text,
            Self::Metadata { .. } => ExtractionMode::Metadata,
            Self::Analysis(_) => ExtractionMode::Analysis,
        }
    }

    pub fn as_analysis(&self) -> Option<&PageAnalysis> {
        match self {
            Self::Analysis(analysis) => Some(analysis),
            _ => None,
        }
    }
}

/// Extracts a record of the requested shape from an HTML page
///
/// `page_url` is only used by analysis mode, which echoes it in the record.
pub fn extract(html: &str, page_url: &str, mode: ExtractionMode) -> PageRecord {
    let document = Html::parse_document(html);
    extract_from_document(&document, page_url, mode)
}

pub(crate) fn extract_from_document(
    document: &Html,
    page_url: &str,
    mode: ExtractionMode,
) -> PageRecord {
    match mode {
        ExtractionMode::Links => PageRecord::Links {
            links: extract_link_entries(document),
        },
        ExtractionMode::Images => PageRecord::Images {
            images: extract_image_entries(document),
        },
        ExtractionMode::Text => PageRecord::Text {
            text: visible_text_blocks(document).join("\n"),
        },
        ExtractionMode::Metadata => PageRecord::Metadata {
            metadata: extract_metadata(document),
        },
        ExtractionMode::Analysis => PageRecord::Analysis(analyze(document, page_url)),
    }
}

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Concatenates the element's text nodes, each trimmed, without separators
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Full element text with only the outer whitespace trimmed
fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn extract_link_entries(document: &Html) -> Vec<LinkEntry> {
    let Some(a_selector) = selector("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| {
            element.value().attr("href").map(|href| LinkEntry {
                text: stripped_text(element),
                url: href.to_string(),
            })
        })
        .collect()
}

fn extract_image_entries(document: &Html) -> Vec<ImageEntry> {
    let Some(img_selector) = selector("img[src]") else {
        return Vec::new();
    };

    document
        .select(&img_selector)
        .filter_map(|element| {
            let attrs = element.value();
            attrs.attr("src").map(|src| ImageEntry {
                alt: attrs.attr("alt").unwrap_or_default().to_string(),
                src: src.to_string(),
            })
        })
        .collect()
}

/// Trimmed text of the first `<title>`; `Some("")` if the element is empty
fn document_title(document: &Html) -> Option<String> {
    let title_selector = selector("title")?;
    document.select(&title_selector).next().map(trimmed_text)
}

/// `content` of the first `<meta name=...>`; `Some("")` if the tag has none
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let meta_selector = selector(&format!("meta[name=\"{}\"]", name))?;
    document.select(&meta_selector).next().map(|element| {
        element
            .value()
            .attr("content")
            .unwrap_or_default()
            .to_string()
    })
}

fn extract_metadata(document: &Html) -> Metadata {
    Metadata {
        title: document_title(document),
        description: meta_content(document, "description"),
        keywords: meta_content(document, "keywords"),
    }
}

/// Visible text blocks in document order
///
/// Every text node outside `<script>`/`<style>` subtrees, trimmed, with
/// empty blocks dropped.
pub fn visible_text_blocks(document: &Html) -> Vec<String> {
    visible_text_nodes(document)
        .into_iter()
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw text nodes outside `<script>`/`<style>`, untrimmed, in document order
fn visible_text_nodes(document: &Html) -> Vec<&str> {
    let mut nodes = Vec::new();
    collect_visible_text(document.root_element(), &mut nodes);
    nodes
}

fn collect_visible_text<'a>(element: ElementRef<'a>, nodes: &mut Vec<&'a str>) {
    if matches!(element.value().name(), "script" | "style") {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => nodes.push(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_visible_text(child_element, nodes);
                }
            }
            _ => {}
        }
    }
}

/// Whitespace-delimited words in the page's visible text
///
/// Text nodes are joined without separators first, so a word broken up by
/// inline tags (`un<b>believ</b>able`) counts once.
fn visible_word_count(document: &Html) -> usize {
    visible_text_nodes(document)
        .concat()
        .split_whitespace()
        .count()
}

fn count_matches(document: &Html, css: &str) -> usize {
    selector(css)
        .map(|s| document.select(&s).count())
        .unwrap_or(0)
}

fn analyze(document: &Html, page_url: &str) -> PageAnalysis {
    let word_count = visible_word_count(document);

    let h1_tags = selector("h1")
        .map(|s| document.select(&s).map(trimmed_text).collect())
        .unwrap_or_default();

    let paragraphs = selector("p")
        .map(|s| {
            document
                .select(&s)
                .map(trimmed_text)
                .filter(|p| !p.is_empty())
                .take(MAX_PARAGRAPHS)
                .collect()
        })
        .unwrap_or_default();

    PageAnalysis {
        url: page_url.to_string(),
        title: document_title(document).unwrap_or_default(),
        meta_description: meta_content(document, "description").unwrap_or_default(),
        word_count,
        image_count: count_matches(document, "img"),
        link_count: count_matches(document, "a"),
        h1_tags,
        paragraphs,
    }
}
