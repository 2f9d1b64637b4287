//! Long-form investigative report pages.
//!
//! Pages under the investigations section are static builds that carry
//! their metadata in a `application/ld+json` block and the story body in
//! `.special-report-article-container`, interleaved with slide markers and
//! share widgets that must not end up in the description.

use super::{first_text, selector, strip, Document};
use crate::error::{EnrichError, ParseError};
use crate::models::FeedItem;
use crate::utils::{join_names, parse_timestamp};
use once_cell::sync::Lazy;
use scraper::Selector;
use serde_json::Value;

static LD_JSON: Lazy<Selector> = Lazy::new(|| selector(r#"script[type="application/ld+json"]"#));
static CONTAINER: Lazy<Selector> = Lazy::new(|| selector(".special-report-article-container"));
static BOILERPLATE: Lazy<Selector> = Lazy::new(|| {
    selector(
        ".special-report-article-container .container, #slide-dek, #slide-end, .share-in-article-container",
    )
});

pub(crate) fn extract(mut item: FeedItem, doc: &Document<'_>) -> Result<FeedItem, EnrichError> {
    let raw = first_text(&doc.html, &LD_JSON)
        .ok_or(ParseError::MissingElement("script[type=\"application/ld+json\"]"))?;
    let ld: Value = serde_json::from_str(raw.trim()).map_err(|e| ParseError::json("ld+json", e))?;
    let ld = report_object(&ld).ok_or(ParseError::MissingField("headline"))?;

    let mut stripped = doc.html.clone();
    strip(&mut stripped, &BOILERPLATE);
    let body = stripped
        .select(&CONTAINER)
        .next()
        .ok_or(ParseError::MissingElement(".special-report-article-container"))?
        .inner_html();

    if let Some(headline) = ld.get("headline").and_then(Value::as_str) {
        item.title = headline.to_string();
    }
    item.published_at = ld
        .get("dateCreated")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);
    item.author = ld.get("creator").map(creator_names).unwrap_or_default();
    item.category = ld.get("keywords").map(keyword_list).unwrap_or_default();
    item.description = body.trim().to_string();

    Ok(item)
}

/// The report object itself, or the first entry of an array/`@graph`
/// carrying a headline.
fn report_object(ld: &Value) -> Option<&Value> {
    let has_headline = |v: &&Value| v.get("headline").is_some();
    match ld {
        Value::Object(map) => match map.get("@graph").and_then(Value::as_array) {
            Some(graph) if !map.contains_key("headline") => graph.iter().find(has_headline),
            _ => Some(ld),
        },
        Value::Array(entries) => entries.iter().find(has_headline),
        _ => None,
    }
}

/// `creator` comes as a plain string, a list of strings, or a list of
/// `{"name": ...}` objects.
fn creator_names(creator: &Value) -> String {
    match creator {
        Value::String(s) => s.trim().to_string(),
        Value::Array(entries) => join_names(entries.iter().filter_map(|e| match e {
            Value::String(s) => Some(s.as_str()),
            other => other.get("name").and_then(Value::as_str),
        })),
        other => other
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

/// `keywords` is either a list or a comma-separated string.
fn keyword_list(keywords: &Value) -> Vec<String> {
    match keywords {
        Value::Array(entries) => entries
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
