//! JSON crawl report envelope
//!
//! Wraps a [`CrawlResult`] with timing and success information, or carries
//! a single error message when the crawl could not run.

use crate::crawler::{CrawlResult, Crawler, ExtractionMode, SkippedPage};
use crate::output::stats::{summarize, CrawlStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;

/// Outcome of one crawl invocation, ready for JSON rendering
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CrawlReport {
    Completed {
        success: bool,
        /// Wall-clock seconds, rounded to two decimals
        time_taken: f64,
        pages_crawled: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        results: CrawlResult,
        skipped: Vec<SkippedPage>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stats: Option<CrawlStats>,
    },
    Failed {
        success: bool,
        error: String,
    },
}

impl CrawlReport {
    pub fn completed(
        results: CrawlResult,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        elapsed_secs: f64,
    ) -> Self {
        Self::Completed {
            success: true,
            time_taken: (elapsed_secs * 100.0).round() / 100.0,
            pages_crawled: results.len(),
            started_at,
            finished_at,
            skipped: results.skipped().to_vec(),
            results,
            stats: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self::Failed {
            success: false,
            error: error.to_string(),
        }
    }

    /// Attaches statistics computed from the analysis records, if any
    pub fn with_stats(mut self) -> Self {
        if let Self::Completed { results, stats, .. } = &mut self {
            if results.analyses().next().is_some() {
                *stats = Some(summarize(results.analyses()));
            }
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn results(&self) -> Option<&CrawlResult> {
        match self {
            Self::Completed { results, .. } => Some(results),
            Self::Failed { .. } => None,
        }
    }
}

/// Runs a crawl and wraps the outcome in a report
///
/// Any invocation-level error becomes a `Failed` report carrying its
/// message; per-page failures stay inside the result.
pub async fn crawl_report(crawler: &Crawler, start_url: &str, mode: ExtractionMode) -> CrawlReport {
    let started_at = Utc::now();
    let timer = Instant::now();

    match crawler.crawl(start_url, mode).await {
        Ok(results) => CrawlReport::completed(
            results,
            started_at,
            Utc::now(),
            timer.elapsed().as_secs_f64(),
        ),
        Err(e) => {
            tracing::error!("Crawl of {} failed: {}", start_url, e);
            CrawlReport::failed(e)
        }
    }
}
