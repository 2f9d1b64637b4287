//! Data models for listing records, feed items, and fetched pages.
//!
//! - [`RawArticle`]: one record of the upstream listing API, as received
//! - [`FeedItem`]: the canonical item handed to the feed-assembly caller
//! - [`FetchedPage`]: an article page as returned by a [`crate::fetch::PageFetcher`]
//! - [`Mode`]: whether a batch is enriched with full article text
//!
//! Every field of [`RawArticle`] is optional, so sparse records decode
//! cleanly. Records whose fields carry the wrong type are skipped one by
//! one by [`crate::listing::parse_listing`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An author entry in the listing API (`{"name": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub name: Option<String>,
}

/// The `kicker` of a listing record, carrying its section labels.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Kicker {
    #[serde(default)]
    pub names: Option<Vec<String>>,
}

/// A raw article summary as returned by the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Usually site-relative, e.g. `/world/europe/some-story-2024-01-01/`.
    pub canonical_url: Option<String>,
    pub published_time: Option<String>,
    pub updated_time: Option<String>,
    pub authors: Option<Vec<RawAuthor>>,
    pub kicker: Option<Kicker>,
    pub description: Option<String>,
}

/// A normalized feed item.
///
/// `description` holds either the listing summary or, after enrichment,
/// the full article body produced by exactly one extraction strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    /// Absolute URL; also the cache key during enrichment.
    pub link: String,
    /// Publisher-assigned identity; unique within a batch after dedup.
    pub guid: String,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Display names joined with `", "`.
    pub author: String,
    pub category: Vec<String>,
    pub description: String,
}

/// A fetched article page.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// URL after redirects; strategy selection looks at this, not the request URL.
    pub final_url: String,
    pub raw_html: String,
}

impl FetchedPage {
    pub fn new(final_url: impl Into<String>, raw_html: impl Into<String>) -> Self {
        Self {
            final_url: final_url.into(),
            raw_html: raw_html.into(),
        }
    }
}

/// Batch enrichment mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Keep listing summaries as descriptions.
    #[default]
    Summary,
    /// Fetch every article page and replace the description with its full text.
    #[value(name = "fulltext")]
    FullText,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_article_tolerates_missing_and_null_fields() {
        let json = r#"{"id": "A1", "authors": null, "kicker": {}}"#;
        let raw: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id.as_deref(), Some("A1"));
        assert!(raw.authors.is_none());
        assert!(raw.kicker.unwrap().names.is_none());
        assert!(raw.canonical_url.is_none());
    }

    #[test]
    fn test_raw_article_full_record() {
        let json = r#"{
            "id": "OQ2Z",
            "title": "Headline",
            "canonical_url": "/world/x/",
            "published_time": "2024-01-01T10:00:00Z",
            "authors": [{"name": "Jane"}, {"name": "John"}],
            "kicker": {"names": ["World", "Europe"]},
            "description": "Summary"
        }"#;
        let raw: RawArticle = serde_json::from_str(json).unwrap();
        assert_eq!(raw.authors.unwrap().len(), 2);
        assert_eq!(
            raw.kicker.unwrap().names.unwrap(),
            vec!["World".to_string(), "Europe".to_string()]
        );
    }

    #[test]
    fn test_feed_item_serialization() {
        let item = FeedItem {
            title: "T".to_string(),
            link: "https://example.com/t".to_string(),
            guid: "g".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"link\":\"https://example.com/t\""));
        assert!(json.contains("\"published_at\":null"));
    }

    #[test]
    fn test_mode_default_is_summary() {
        assert_eq!(Mode::default(), Mode::Summary);
    }
}
