//! HTTP fetcher implementation
//!
//! This module handles every HTTP request the crawler makes:
//! - Building HTTP clients with the identifying user agent and timeout
//! - Issuing a single GET per page, no retries
//! - Classifying failures into a typed [`FetchFailure`]
//!
//! Fetching never returns an error to the caller. Every outcome, good or bad,
//! comes back as a [`FetchOutcome`] so the crawl loop can record a skipped
//! page and move on.

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// Server answered with something other than 200 OK
    Status(u16),

    /// The request did not complete within the configured timeout
    Timeout,

    /// Connection could not be established (DNS failure, refused, TLS)
    Connect(String),

    /// Any other transport-level error
    Transport(String),

    /// Response headers arrived but the body could not be read or decoded
    Body(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::Timeout => write!(f, "Request timeout"),
            Self::Connect(e) => write!(f, "Connection failed: {}", e),
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Body(e) => write!(f, "Failed to read body: {}", e),
        }
    }
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Page returned 200 with a readable body
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Decoded page body
        body: String,
    },

    /// Page was not fetched
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the body on success
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::Failure(_) => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The identifying user agent configuration
/// * `timeout` - Total per-request timeout
///
/// # Example
///
/// ```no_run
/// use page_harvest::config::UserAgentConfig;
/// use page_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 200 (after redirects) | `Success` |
/// | Any other status | `Failure(Status)` |
/// | Timeout | `Failure(Timeout)` |
/// | Connection refused / DNS / TLS | `Failure(Connect)` |
/// | Undecodable body | `Failure(Body)` |
/// | Anything else | `Failure(Transport)` |
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let failure = classify_error(&e);
            tracing::warn!("Failed to fetch {}: {}", url, failure);
            return FetchOutcome::Failure(failure);
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!("Failed to fetch {}: status {}", url, status.as_u16());
        return FetchOutcome::Failure(FetchFailure::Status(status.as_u16()));
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(body) => FetchOutcome::Success { final_url, body },
        Err(e) => {
            let failure = if e.is_timeout() {
                FetchFailure::Timeout
            } else {
                FetchFailure::Body(e.to_string())
            };
            tracing::warn!("Failed to read body of {}: {}", url, failure);
            FetchOutcome::Failure(failure)
        }
    }
}

fn classify_error(e: &reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connect(e.to_string())
    } else {
        FetchFailure::Transport(e.to_string())
    }
}
