//! Runtime configuration for the pipeline.
//!
//! [`PipelineConfig`] carries every tunable the fetcher, cache and
//! orchestrator need. The binary builds it from [`crate::cli::Cli`]; library
//! callers start from [`PipelineConfig::default`].

use crate::cli::Cli;
use crate::scrapers::INVESTIGATIONS_PREFIX;
use std::time::Duration;

/// Number of article pages fetched concurrently.
pub const DEFAULT_CONCURRENCY: usize = 12;

/// Browser-like UA; the publisher rejects requests without one.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Upper bound on in-flight page fetches during batch enrichment.
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Retries for transient fetch failures; 0 disables retrying.
    pub max_retries: usize,
    pub retry_base_delay: Duration,
    /// Maximum number of enriched items kept in the cache.
    pub cache_capacity: u64,
    pub cache_ttl: Duration,
    /// Final-URL prefix that selects the investigative-report strategy.
    pub investigations_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_retries: 3,
            retry_base_delay: Duration::from_secs(1),
            cache_capacity: 1_000,
            cache_ttl: Duration::from_secs(60 * 60),
            investigations_prefix: INVESTIGATIONS_PREFIX.to_string(),
        }
    }
}

impl From<&Cli> for PipelineConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            concurrency: cli.concurrency.max(1),
            request_timeout: Duration::from_secs(cli.timeout_secs),
            user_agent: cli.user_agent.clone(),
            max_retries: cli.max_retries,
            cache_capacity: cli.cache_capacity,
            cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.concurrency, 12);
        assert_eq!(config.investigations_prefix, "https://www.reuters.com/investigates/");
        assert!(config.cache_capacity > 0);
    }

    #[test]
    fn test_from_cli() {
        let cli = Cli::parse_from([
            "reuters_feed",
            "--listing-url",
            "https://www.reuters.com/pf/api/v3/content/fetch/articles-by-section-alias-or-id-v1",
            "--concurrency",
            "0",
            "--timeout-secs",
            "5",
            "--cache-ttl-secs",
            "120",
        ]);
        let config = PipelineConfig::from(&cli);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.cache_ttl, Duration::from_secs(120));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
