//! # reuters_feed
//!
//! Fetches one article listing, normalizes it into feed items, optionally
//! enriches every item with its full article text, and writes the items as
//! JSON for the feed-assembly step.
//!
//! Meant to be invoked on demand by an external scheduler.
//!
//! ## Usage
//!
//! ```sh
//! reuters_feed --listing-url "$URL" --mode fulltext -o ./world.json
//! ```

use clap::Parser;
use reuters_feed::cli::Cli;
use reuters_feed::outputs::json;
use reuters_feed::{
    build_items, fetch_listing, Enricher, HttpFetcher, PipelineConfig, RetryFetch,
};
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("reuters_feed starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let base_url = match Url::parse(&args.base_url) {
        Ok(url) => url,
        Err(e) => {
            error!(base_url = %args.base_url, error = %e, "Invalid base URL");
            return Err(e.into());
        }
    };

    let config = PipelineConfig::from(&args);
    let fetcher = RetryFetch::new(
        HttpFetcher::new(&config)?,
        config.max_retries,
        config.retry_base_delay,
    );

    // ---- Listing ----
    let records = fetch_listing(&fetcher, &args.listing_url).await?;
    let items = build_items(&records, &base_url);
    info!(records = records.len(), items = items.len(), "Normalized listing");

    // ---- Enrichment ----
    let enricher = Enricher::from_config(fetcher, &config);
    let items = enricher.enrich_batch(items, args.mode).await;

    // ---- Output ----
    if let Err(e) = json::write_items(&items, args.output.as_deref()).await {
        error!(error = %e, "Failed to write JSON items");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        items = items.len(),
        mode = ?args.mode,
        "Execution complete"
    );

    Ok(())
}
