//! Listing endpoint client.
//!
//! The listing endpoints answer with
//! `{"result": {"articles": [...], ...}}`. The caller passes the complete
//! endpoint URL (section or topic query already encoded); this module only
//! fetches it and hands back the raw records.

use crate::error::{EnrichError, ParseError};
use crate::fetch::PageFetcher;
use crate::models::RawArticle;
use crate::utils::truncate_for_log;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

#[derive(Debug, Default, Deserialize)]
struct ListingResponse {
    #[serde(default)]
    result: Option<ListingResult>,
}

#[derive(Debug, Default, Deserialize)]
struct ListingResult {
    #[serde(default)]
    articles: Option<Vec<Value>>,
}

/// Parse a listing response body into its raw article records.
///
/// Records are decoded one at a time: an entry whose fields have the wrong
/// type is logged and skipped, and the rest of the listing survives.
///
/// # Arguments
///
/// * `body` - The listing endpoint's response body
///
/// # Returns
///
/// The decodable records in listing order. A response without
/// `result.articles` yields an empty list; a body that is not JSON at all
/// is a [`ParseError::Json`].
pub fn parse_listing(body: &str) -> Result<Vec<RawArticle>, ParseError> {
    let response: ListingResponse = serde_json::from_str(body).map_err(|e| {
        warn!(preview = %truncate_for_log(body, 300), error = %e, "Listing is not valid JSON");
        ParseError::json("listing response", e)
    })?;

    let entries = response
        .result
        .and_then(|r| r.articles)
        .unwrap_or_default();

    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<RawArticle>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed listing record");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Fetch the listing at `url` and return its raw records.
///
/// # Arguments
///
/// * `fetcher` - Any [`PageFetcher`], usually an [`crate::fetch::HttpFetcher`] behind retries
/// * `url` - Complete listing endpoint URL, query included
///
/// # Returns
///
/// The parsed records, or the fetch or parse error that prevented reading
/// the listing.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_listing<F>(fetcher: &F, url: &str) -> Result<Vec<RawArticle>, EnrichError>
where
    F: PageFetcher,
{
    let page = fetcher.fetch_page(url).await?;
    let records = parse_listing(&page.raw_html)?;
    info!(count = records.len(), "Fetched listing");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::FetchedPage;

    struct StaticFetcher(&'static str);

    impl PageFetcher for StaticFetcher {
        async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
            Ok(FetchedPage::new(url, self.0))
        }
    }

    #[test]
    fn test_parse_listing() {
        let body = r#"{
            "statusCode": 200,
            "result": {
                "section": {"title": "World"},
                "articles": [
                    {"id": "A1", "title": "One", "canonical_url": "/world/one/"},
                    {"id": "A2", "title": "Two", "canonical_url": "/world/two/", "authors": []}
                ]
            }
        }"#;
        let records = parse_listing(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id.as_deref(), Some("A2"));
    }

    #[test]
    fn test_parse_listing_without_articles() {
        assert!(parse_listing(r#"{"result": {}}"#).unwrap().is_empty());
        assert!(parse_listing(r#"{"statusCode": 404}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_listing_skips_mistyped_records() {
        let body = r#"{"result":{"articles":[
            {"id": "A1", "title": "One", "canonical_url": "/world/one/"},
            {"id": 12345, "title": "Numeric id"},
            {"id": "A3", "authors": "Jane"},
            {"id": "A4", "kicker": {"names": [null]}},
            {"id": "A5", "title": "Five", "authors": [{"name": "Jane"}]}
        ]}}"#;
        let records = parse_listing(body).unwrap();
        let ids: Vec<_> = records.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["A1", "A5"]);
    }

    #[test]
    fn test_parse_listing_rejects_garbage() {
        let err = parse_listing("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
    }

    #[tokio::test]
    async fn test_fetch_listing() {
        let fetcher = StaticFetcher(r#"{"result":{"articles":[{"id":"A1"}]}}"#);
        let records = fetch_listing(&fetcher, "https://example.com/listing").await.unwrap();
        assert_eq!(records.len(), 1);
    }
}
