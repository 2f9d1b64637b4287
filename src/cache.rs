//! Per-URL cache of enriched items.
//!
//! Backed by a `moka` async cache bounded by entry count and TTL.
//! Concurrent lookups of the same key share one in-flight computation, and
//! a failed computation is never stored, so the next lookup runs the
//! producer again.

use crate::config::PipelineConfig;
use crate::error::EnrichError;
use crate::models::FeedItem;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

#[derive(Clone)]
pub struct ContentCache {
    cache: Cache<String, FeedItem>,
    capacity: u64,
}

impl ContentCache {
    /// Create a cache holding at most `max_capacity` items for `ttl` each.
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self {
            cache,
            capacity: max_capacity,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.cache_capacity, config.cache_ttl)
    }

    /// Return the cached item for `key`, or run `producer` and cache its
    /// success.
    ///
    /// Callers racing on the same key await a single `producer`; all of
    /// them receive its outcome. Errors are shared through an `Arc` and are
    /// not cached.
    pub async fn get_or_compute<F>(&self, key: &str, producer: F) -> Result<FeedItem, Arc<EnrichError>>
    where
        F: Future<Output = Result<FeedItem, EnrichError>>,
    {
        trace!(%key, "Cache lookup");
        self.cache.try_get_with_by_ref(key, producer).await
    }

    pub async fn get(&self, key: &str) -> Option<FeedItem> {
        self.cache.get(key).await
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl std::fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentCache")
            .field("capacity", &self.capacity)
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn item(link: &str) -> FeedItem {
        FeedItem {
            link: link.to_string(),
            title: "cached".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_hit_skips_producer() {
        let cache = ContentCache::new(10, Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cache
                .get_or_compute("https://e.com/a", async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(item("https://e.com/a"))
                })
                .await
                .unwrap();
            assert_eq!(got.title, "cached");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.get("https://e.com/a").await.is_some());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = ContentCache::new(10, Duration::from_secs(60));

        let first = cache
            .get_or_compute("https://e.com/a", async {
                Err(FetchError::request("https://e.com/a", "connection reset").into())
            })
            .await;
        assert!(first.is_err());
        assert!(cache.get("https://e.com/a").await.is_none());

        let second = cache
            .get_or_compute("https://e.com/a", async { Ok(item("https://e.com/a")) })
            .await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_same_key_runs_producer_once() {
        let cache = ContentCache::new(10, Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let lookup = || {
            cache.get_or_compute("https://e.com/same", async {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(item("https://e.com/same"))
            })
        };
        let (a, b, c) = tokio::join!(lookup(), lookup(), lookup());

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = ContentCache::new(10, Duration::from_secs(60));
        cache
            .get_or_compute("k", async { Ok(item("k")) })
            .await
            .unwrap();
        cache.invalidate("k").await;
        assert!(cache.get("k").await.is_none());
        assert_eq!(cache.capacity(), 10);
    }
}
