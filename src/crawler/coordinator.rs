//! Crawler coordinator - main crawl orchestration logic
//!
//! [`Crawler`] holds only immutable settings. Each call to
//! [`Crawler::crawl`] builds its own [`CrawlSession`] (HTTP client, frontier,
//! link filter, result) and drops it when the run ends, so concurrent crawls
//! on the same `Crawler` never share state.

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::crawler::extract::{extract_from_document, ExtractionMode};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::parser::extract_links_from_document;
use crate::crawler::result::{CrawlResult, SkipReason};
use crate::crawler::scheduler::{CrawlTask, Frontier};
use crate::crawler::scrape::{scrape_page, ScrapeOutcome};
use crate::state::CrawlPhase;
use crate::url::{normalize_url, LinkFilter};
use crate::CrawlerError;
use reqwest::Client;
use scraper::Html;
use std::time::{Duration, Instant};
use url::Url;

/// Breadth-first crawler configured once and run any number of times
#[derive(Debug, Clone, Default)]
pub struct Crawler {
    config: CrawlerConfig,
    user_agent: UserAgentConfig,
}

impl Crawler {
    /// Creates a crawler with the default user agent
    pub fn new(config: CrawlerConfig) -> Self {
        Self {
            config,
            user_agent: UserAgentConfig::default(),
        }
    }

    /// Creates a crawler from a loaded configuration file
    pub fn from_config(config: &Config) -> Self {
        Self {
            config: config.crawler.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: UserAgentConfig) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls breadth-first from `start_url`, extracting `mode` from each page
    ///
    /// Per-page failures are recorded as skipped pages and never abort the
    /// crawl. An error is returned only when the run cannot start at all.
    ///
    /// A start URL that does not parse produces an empty result without any
    /// fetch.
    pub async fn crawl(
        &self,
        start_url: &str,
        mode: ExtractionMode,
    ) -> Result<CrawlResult, CrawlerError> {
        let start = match normalize_url(start_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Not crawling {}: {}", start_url, e);
                let mut result = CrawlResult::new();
                if self.config.max_pages > 0 {
                    result.record_skip(start_url, 0, SkipReason::InvalidUrl(e.to_string()));
                }
                return Ok(result);
            }
        };

        let client = build_http_client(&self.user_agent, self.config.timeout())?;
        let session = CrawlSession::new(client, &start, mode, &self.config);
        session.run().await
    }

    /// Fetches a single page and extracts `pattern` matches from it
    pub async fn scrape(
        &self,
        url: &str,
        pattern: Option<&str>,
    ) -> Result<ScrapeOutcome, CrawlerError> {
        let client = build_http_client(&self.user_agent, self.config.timeout())?;
        Ok(scrape_page(&client, url, pattern).await)
    }
}

/// Per-invocation crawl state
///
/// Owns the HTTP client, the frontier and the growing result. Created at the
/// start of [`Crawler::crawl`] and consumed by [`CrawlSession::run`].
struct CrawlSession {
    phase: CrawlPhase,
    client: Client,
    frontier: Frontier,
    filter: LinkFilter,
    mode: ExtractionMode,
    politeness_delay: Duration,
    result: CrawlResult,
}

impl CrawlSession {
    fn new(client: Client, start: &Url, mode: ExtractionMode, config: &CrawlerConfig) -> Self {
        Self {
            phase: CrawlPhase::Idle,
            client,
            frontier: Frontier::new(start.as_str(), config.depth_limit, config.max_pages),
            filter: LinkFilter::for_start_url(start),
            mode,
            politeness_delay: config.politeness_delay(),
            result: CrawlResult::new(),
        }
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), CrawlerError> {
        if !self.phase.can_transition_to(next) {
            return Err(CrawlerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Runs the fetch/extract/enqueue cycle until the frontier is drained
    async fn run(mut self) -> Result<CrawlResult, CrawlerError> {
        self.transition(CrawlPhase::Running)?;

        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (mode: {})",
            self.filter.host().unwrap_or_default(),
            self.mode
        );

        while let Some(task) = self.frontier.next_task() {
            tracing::info!("Crawling: {} (depth: {})", task.url, task.depth);

            let processed = self.process_task(&task).await;

            if processed && self.frontier.has_pending() && !self.politeness_delay.is_zero() {
                tokio::time::sleep(self.politeness_delay).await;
            }
        }

        self.transition(CrawlPhase::Done)?;

        tracing::info!(
            "Crawl completed: {} pages extracted, {} skipped in {:?}",
            self.result.len(),
            self.result.skipped().len(),
            start_time.elapsed()
        );

        Ok(self.result)
    }

    /// Fetches, extracts and expands one task
    ///
    /// Returns true if the page was fetched and a record stored.
    async fn process_task(&mut self, task: &CrawlTask) -> bool {
        let (final_url, body) = match fetch_page(&self.client, &task.url).await {
            FetchOutcome::Success { final_url, body } => (final_url, body),
            FetchOutcome::Failure(failure) => {
                self.result
                    .record_skip(&task.url, task.depth, SkipReason::Fetch(failure));
                return false;
            }
        };

        let document = Html::parse_document(&body);
        let record = extract_from_document(&document, &task.url, self.mode);
        self.result.record_page(&task.url, task.depth, record);

        if self.frontier.should_expand(task.depth) {
            // Relative links resolve against where the request actually landed
            let base = Url::parse(&final_url).or_else(|_| Url::parse(&task.url));
            if let Ok(base) = base {
                let mut enqueued = 0;
                for link in extract_links_from_document(&document, &base, &self.filter) {
                    if self.frontier.enqueue(link, task.depth) {
                        enqueued += 1;
                    }
                }
                tracing::debug!(
                    "Enqueued {} links from {} ({} in queue)",
                    enqueued,
                    task.url,
                    self.frontier.queue_len()
                );
            }
        }

        true
    }
}

/// Runs a crawl with default settings and the given bounds
///
/// `mode` is validated before anything is fetched; an unknown mode name
/// fails the whole invocation with a [`crate::ConfigError::InvalidMode`].
///
/// # Example
///
/// ```no_run
/// use page_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), page_harvest::CrawlerError> {
/// let result = crawl("https://example.com", "metadata", 1, 10).await?;
/// println!("{}", serde_json::to_string_pretty(&result)?);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    start_url: &str,
    mode: &str,
    depth_limit: u32,
    max_pages: usize,
) -> Result<CrawlResult, CrawlerError> {
    let mode: ExtractionMode = mode.parse()?;
    let crawler = Crawler::new(CrawlerConfig {
        depth_limit,
        max_pages,
        ..CrawlerConfig::default()
    });
    crawler.crawl(start_url, mode).await
}
