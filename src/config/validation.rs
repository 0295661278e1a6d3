use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MAX_TIMEOUT_SECONDS: u64 = 300;
const MAX_POLITENESS_DELAY_MS: u64 = 60_000;
const MAX_PAGES_LIMIT: usize = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // depth_limit >= 0 is always true for u32, so no check needed

    if config.max_pages < 1 || config.max_pages > MAX_PAGES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGES_LIMIT, config.max_pages
        )));
    }

    if config.timeout_seconds < 1 || config.timeout_seconds > MAX_TIMEOUT_SECONDS {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECONDS, config.timeout_seconds
        )));
    }

    if config.politeness_delay_ms > MAX_POLITENESS_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "politeness_delay_ms must be <= {}ms, got {}ms",
            MAX_POLITENESS_DELAY_MS, config.politeness_delay_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}
