//! # reuters_feed
//!
//! Turns the publisher's internal article listings into normalized feed
//! items and, on request, replaces each item's summary with the full
//! article text.
//!
//! ## Pipeline
//!
//! 1. **Listing**: fetch the listing endpoint and read its raw records ([`listing`])
//! 2. **Normalization**: convert records to [`FeedItem`]s and drop duplicate guids ([`normalize`])
//! 3. **Enrichment** (full-text mode only): fetch each article page concurrently
//!    through a per-URL cache and extract its content ([`pipeline`], [`scrapers`])
//!
//! Failures in step 3 are per item: a page that cannot be fetched or parsed
//! removes only that item from the batch.
//!
//! ## Example
//!
//! ```ignore
//! let config = PipelineConfig::default();
//! let fetcher = RetryFetch::new(HttpFetcher::new(&config)?, config.max_retries, config.retry_base_delay);
//! let records = fetch_listing(&fetcher, listing_url).await?;
//! let items = build_items(&records, &Url::parse("https://www.reuters.com")?);
//! let items = Enricher::from_config(fetcher, &config).enrich_batch(items, Mode::FullText).await;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod listing;
pub mod models;
pub mod normalize;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod template;
pub mod utils;

pub use cache::ContentCache;
pub use config::PipelineConfig;
pub use error::{EnrichError, FetchError, ParseError, TemplateError};
pub use fetch::{HttpFetcher, PageFetcher, RetryFetch};
pub use listing::{fetch_listing, parse_listing};
pub use models::{FeedItem, FetchedPage, Mode, RawArticle};
pub use normalize::{build_items, dedupe, normalize};
pub use pipeline::Enricher;
pub use scrapers::{Extractor, Strategy};
pub use template::{ArticleTemplate, DescriptionRenderer};
