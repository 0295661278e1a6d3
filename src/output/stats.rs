//! Summary statistics over analysis records
//!
//! This module turns a sequence of [`PageAnalysis`] records into totals,
//! per-page averages and the most frequent title/description terms, and
//! prints them for humans.

use crate::crawler::PageAnalysis;
use serde::Serialize;
use std::collections::HashMap;

/// Number of frequent terms reported
pub const TOP_TERMS: usize = 10;

/// One frequent term and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlStats {
    /// Number of analysis records summarized
    pub total_pages: usize,

    pub total_words: usize,
    pub total_images: usize,
    pub total_links: usize,

    /// Per-page averages; 0 when there are no pages
    pub avg_words: f64,
    pub avg_images: f64,
    pub avg_links: f64,

    /// Most frequent whitespace-delimited terms across titles and descriptions
    pub common_words: Vec<TermCount>,
}

/// Summarizes analysis records
///
/// # Example
///
/// ```
/// use page_harvest::crawler::PageAnalysis;
/// use page_harvest::output::summarize;
///
/// let records: Vec<PageAnalysis> = Vec::new();
/// let stats = summarize(&records);
/// assert_eq!(stats.total_pages, 0);
/// assert_eq!(stats.avg_words, 0.0);
/// ```
pub fn summarize<'a, I>(records: I) -> CrawlStats
where
    I: IntoIterator<Item = &'a PageAnalysis>,
{
    let mut stats = CrawlStats::default();
    let mut corpus = String::new();

    for record in records {
        stats.total_pages += 1;
        stats.total_words += record.word_count;
        stats.total_images += record.image_count;
        stats.total_links += record.link_count;

        corpus.push_str(&record.title);
        corpus.push(' ');
        corpus.push_str(&record.meta_description);
        corpus.push(' ');
    }

    if stats.total_pages > 0 {
        let pages = stats.total_pages as f64;
        stats.avg_words = stats.total_words as f64 / pages;
        stats.avg_images = stats.total_images as f64 / pages;
        stats.avg_links = stats.total_links as f64 / pages;
    }

    stats.common_words = most_common_terms(&corpus, TOP_TERMS);
    stats
}

/// Counts whitespace-delimited terms, highest count first
///
/// Terms with equal counts keep the order in which they first appeared.
pub fn most_common_terms(text: &str, limit: usize) -> Vec<TermCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for term in text.split_whitespace() {
        let count = counts.entry(term).or_insert(0);
        if *count == 0 {
            order.push(term);
        }
        *count += 1;
    }

    let mut ranked: Vec<TermCount> = order
        .into_iter()
        .map(|term| TermCount {
            term: term.to_string(),
            count: counts[term],
        })
        .collect();

    // Stable sort keeps first-seen order among ties
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages analyzed: {}", stats.total_pages);
    println!(
        "  Words: {} total, {:.2} per page",
        stats.total_words, stats.avg_words
    );
    println!(
        "  Images: {} total, {:.2} per page",
        stats.total_images, stats.avg_images
    );
    println!(
        "  Links: {} total, {:.2} per page",
        stats.total_links, stats.avg_links
    );
    println!();

    if !stats.common_words.is_empty() {
        println!("Common Terms:");
        for term in &stats.common_words {
            println!("  {}: {}", term.term, term.count);
        }
    }
}
