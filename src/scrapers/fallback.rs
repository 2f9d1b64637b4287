//! Plain HTML scrape for pages without an embedded payload.
//!
//! The publication date and bylines are pulled out of the page's inline
//! structured data with regular expressions over the raw source. These
//! patterns depend on the exact key order the publisher serializes
//! (`"datePublished"` directly followed by `"dateModified"`, persons as
//! `{"@type":"Person","name":"..."}`) and are covered by fixture tests
//! rather than a full structured-data parser.

use super::{selector, strip, Document};
use crate::error::{EnrichError, ParseError};
use crate::models::FeedItem;
use crate::utils::{join_names, parse_timestamp};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

static HEADER_NOISE: Lazy<Selector> = Lazy::new(|| selector(".title, .article-metadata"));
static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector(r#"meta[property="og:title"]"#));
static ARTICLE: Lazy<Selector> = Lazy::new(|| selector("article"));

static DATE_PUBLISHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""datePublished":"(.*?)","dateModified"#).unwrap());
static PERSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{"@type":"Person","name":"(.*?)"\}"#).unwrap());

pub(crate) fn extract(mut item: FeedItem, doc: &Document<'_>) -> Result<FeedItem, EnrichError> {
    let source = doc.page.raw_html.as_str();

    let published = DATE_PUBLISHED
        .captures(source)
        .and_then(|c| c.get(1))
        .ok_or(ParseError::MissingPattern("\"datePublished\":\"...\",\"dateModified\""))?;

    let names: Vec<String> = PERSON
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .map(|m| unescape_json_string(m.as_str()))
        .collect();
    if names.is_empty() {
        return Err(ParseError::MissingPattern("{\"@type\":\"Person\",\"name\":\"...\"}").into());
    }

    let mut stripped = doc.html.clone();
    strip(&mut stripped, &HEADER_NOISE);
    let body = stripped
        .select(&ARTICLE)
        .next()
        .ok_or(ParseError::MissingElement("article"))?
        .inner_html();

    if let Some(title) = stripped
        .select(&OG_TITLE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .filter(|t| !t.trim().is_empty())
    {
        item.title = title.trim().to_string();
    }
    item.published_at = parse_timestamp(published.as_str());
    item.author = join_names(&names);
    item.description = body.trim().to_string();

    Ok(item)
}

/// Decode JSON string escapes (`\u0027`, `\"`) in a captured value; falls
/// back to the raw capture when it is not a valid JSON string body.
fn unescape_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
