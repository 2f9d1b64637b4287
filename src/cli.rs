//! Command-line interface definitions for reuters_feed.
//!
//! All arguments can be provided via command-line flags or environment
//! variables.

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_USER_AGENT};
use crate::models::Mode;
use clap::Parser;

/// Fetch an article listing, normalize it, and optionally enrich every
/// item with its full article text.
///
/// # Examples
///
/// ```sh
/// # Summaries only, printed to stdout
/// reuters_feed --listing-url "https://www.reuters.com/pf/api/v3/content/fetch/articles-by-section-alias-or-id-v1?query=..."
///
/// # Full text, written to a file
/// reuters_feed --listing-url "$URL" --mode fulltext -o world.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Complete URL of the listing endpoint, including its query
    #[arg(short, long, env = "REUTERS_FEED_LISTING_URL")]
    pub listing_url: String,

    /// Base URL that relative article links are resolved against
    #[arg(short, long, env = "REUTERS_FEED_BASE_URL", default_value = "https://www.reuters.com")]
    pub base_url: String,

    /// Whether to fetch every article page for its full text
    #[arg(short, long, value_enum, env = "REUTERS_FEED_MODE", default_value_t = Mode::Summary)]
    pub mode: Mode,

    /// Output file for the JSON items (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Maximum number of article pages fetched concurrently
    #[arg(long, env = "REUTERS_FEED_CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "REUTERS_FEED_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Retries for transient fetch failures
    #[arg(long, env = "REUTERS_FEED_MAX_RETRIES", default_value_t = 3)]
    pub max_retries: usize,

    /// How long an enriched article stays cached, in seconds
    #[arg(long, env = "REUTERS_FEED_CACHE_TTL_SECS", default_value_t = 3600)]
    pub cache_ttl_secs: u64,

    /// Maximum number of enriched articles kept in the cache
    #[arg(long, env = "REUTERS_FEED_CACHE_CAPACITY", default_value_t = 1000)]
    pub cache_capacity: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "REUTERS_FEED_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "reuters_feed",
            "--listing-url",
            "https://example.com/listing",
            "--mode",
            "fulltext",
            "--output",
            "./items.json",
        ]);

        assert_eq!(cli.listing_url, "https://example.com/listing");
        assert_eq!(cli.mode, Mode::FullText);
        assert_eq!(cli.output.as_deref(), Some("./items.json"));
        assert_eq!(cli.base_url, "https://www.reuters.com");
    }

    #[test]
    fn test_cli_short_flags_and_defaults() {
        let cli = Cli::parse_from([
            "reuters_feed",
            "-l",
            "https://example.com/listing",
            "-b",
            "https://example.com",
        ]);

        assert_eq!(cli.base_url, "https://example.com");
        assert_eq!(cli.mode, Mode::Summary);
        assert_eq!(cli.concurrency, DEFAULT_CONCURRENCY);
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let result = Cli::try_parse_from(["reuters_feed", "-l", "u", "--mode", "everything"]);
        assert!(result.is_err());
    }
}
