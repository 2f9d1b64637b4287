//! Batch enrichment of feed items.
//!
//! [`Enricher::enrich_batch`] fetches every item's article page
//! concurrently (at most `concurrency` at a time), runs the strategy
//! selector on it through the per-URL [`ContentCache`], and returns the
//! items that succeeded in their original order. Failed items are logged
//! and dropped; the batch itself never fails.

use crate::cache::ContentCache;
use crate::config::PipelineConfig;
use crate::error::{EnrichError, FetchError};
use crate::fetch::PageFetcher;
use crate::models::{FeedItem, Mode};
use crate::scrapers::Extractor;
use crate::template::ArticleTemplate;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub struct Enricher<F> {
    fetcher: F,
    cache: ContentCache,
    extractor: Extractor,
    concurrency: usize,
}

impl<F> Enricher<F>
where
    F: PageFetcher,
{
    pub fn new(fetcher: F, cache: ContentCache, extractor: Extractor, concurrency: usize) -> Self {
        Self {
            fetcher,
            cache,
            extractor,
            concurrency: concurrency.max(1),
        }
    }

    /// Wire an enricher from `config` with the default template.
    pub fn from_config(fetcher: F, config: &PipelineConfig) -> Self {
        let extractor = Extractor::new(
            config.investigations_prefix.clone(),
            Arc::new(ArticleTemplate),
        );
        Self::new(
            fetcher,
            ContentCache::from_config(config),
            extractor,
            config.concurrency,
        )
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Enrich a single item through the cache keyed by its link.
    ///
    /// The cached value is shared by every item with the same link, so the
    /// returned item always carries the caller's own `guid`, `link` and
    /// `updated_at`. Items without a link are rejected without a fetch.
    ///
    /// # Arguments
    ///
    /// * `item` - The normalized item whose article page should be fetched
    ///
    /// # Returns
    ///
    /// The enriched copy of `item`, or the shared error of the fetch or
    /// extraction that failed for its link.
    pub async fn enrich_one(&self, item: &FeedItem) -> Result<FeedItem, Arc<EnrichError>> {
        if item.link.is_empty() {
            return Err(Arc::new(EnrichError::from(FetchError::InvalidUrl(String::new()))));
        }

        let mut enriched = self
            .cache
            .get_or_compute(&item.link, async {
                let page = self
                    .fetcher
                    .fetch_page(&item.link)
                    .await
                    .map_err(EnrichError::from)?;
                self.extractor.enrich(item, &page)
            })
            .await?;

        enriched.guid.clone_from(&item.guid);
        enriched.link.clone_from(&item.link);
        enriched.updated_at = item.updated_at;
        Ok(enriched)
    }

    /// Enrich `items` according to `mode`.
    ///
    /// In [`Mode::Summary`] the items are returned untouched. In
    /// [`Mode::FullText`] every item is enriched concurrently, at most
    /// `concurrency` at a time, and the batch waits for all of them.
    ///
    /// # Arguments
    ///
    /// * `items` - Normalized, deduplicated items in listing order
    /// * `mode` - Whether to replace summaries with full article text
    ///
    /// # Returns
    ///
    /// The successfully enriched items in input order. Items whose page
    /// could not be fetched or parsed are logged at `warn` and left out;
    /// the batch itself never fails.
    #[instrument(level = "info", skip_all, fields(count = items.len(), ?mode))]
    pub async fn enrich_batch(&self, items: Vec<FeedItem>, mode: Mode) -> Vec<FeedItem> {
        if mode != Mode::FullText {
            debug!("Summary mode; skipping enrichment");
            return items;
        }

        let total = items.len();
        let mut slots: Vec<Option<FeedItem>> = (0..total).map(|_| None).collect();

        let mut outcomes = stream::iter(items.iter().enumerate())
            .map(|(index, item)| async move { (index, self.enrich_one(item).await) })
            .buffer_unordered(self.concurrency);

        while let Some((index, outcome)) = outcomes.next().await {
            match outcome {
                Ok(enriched) => {
                    debug!(index, link = %enriched.link, "Enriched item");
                    slots[index] = Some(enriched);
                }
                Err(e) => {
                    warn!(index, link = %items[index].link, error = %e, "Enrichment failed; dropping item");
                }
            }
        }

        let enriched: Vec<FeedItem> = slots.into_iter().flatten().collect();
        info!(
            total,
            enriched = enriched.len(),
            failed = total - enriched.len(),
            "Completed batch enrichment"
        );
        enriched
    }
}
