//! Listing record normalization and batch deduplication.
//!
//! Both operations are total: a malformed record yields an item with empty
//! or `None` fields instead of an error, so one bad record never costs the
//! rest of the listing.

use crate::models::{FeedItem, RawArticle};
use crate::utils::{join_names, parse_timestamp};
use itertools::Itertools;
use url::Url;

/// Convert one listing record into a [`FeedItem`].
///
/// `canonical_url` is resolved against `base_url`; when the join fails the
/// raw value is kept as-is. A record without a `canonical_url` gets an
/// empty `link` rather than the base URL itself.
///
/// # Arguments
///
/// * `raw` - One record of the listing response
/// * `base_url` - Site root that relative canonical URLs are resolved against
///
/// # Returns
///
/// The normalized item. Missing fields become empty strings, empty lists
/// or `None`; this never fails.
pub fn normalize(raw: &RawArticle, base_url: &Url) -> FeedItem {
    let link = match raw.canonical_url.as_deref().map(str::trim) {
        Some(canonical) if !canonical.is_empty() => base_url
            .join(canonical)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| canonical.to_string()),
        _ => String::new(),
    };

    let author = raw
        .authors
        .as_deref()
        .map(|authors| join_names(authors.iter().filter_map(|a| a.name.as_deref())))
        .unwrap_or_default();

    let category = raw
        .kicker
        .as_ref()
        .and_then(|k| k.names.clone())
        .unwrap_or_default();

    FeedItem {
        title: raw.title.clone().unwrap_or_default(),
        link,
        guid: raw.id.clone().unwrap_or_default(),
        published_at: raw.published_time.as_deref().and_then(parse_timestamp),
        updated_at: raw.updated_time.as_deref().and_then(parse_timestamp),
        author,
        category,
        description: raw.description.clone().unwrap_or_default(),
    }
}

/// Keep the first item for every distinct `guid`, preserving order.
///
/// # Arguments
///
/// * `items` - Normalized items in listing order
///
/// # Returns
///
/// The items with later duplicates removed. Its length equals the number
/// of distinct guids in the input.
pub fn dedupe(items: Vec<FeedItem>) -> Vec<FeedItem> {
    items
        .into_iter()
        .unique_by(|item| item.guid.clone())
        .collect()
}

/// Normalize every record against `base_url`, then dedupe the batch.
pub fn build_items(records: &[RawArticle], base_url: &Url) -> Vec<FeedItem> {
    let items = records.iter().map(|r| normalize(r, base_url)).collect();
    let items = dedupe(items);
    tracing::debug!(records = records.len(), items = items.len(), "Normalized listing");
    items
}
