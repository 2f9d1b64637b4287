//! Pages rendered by the publisher's Fusion platform.
//!
//! These pages ship the complete article as a JSON assignment inside
//! `script#fusion-metadata`:
//!
//! ```text
//! Fusion.globalContent={"result":{"title":...,"display_time":...,"authors":[...],...}};
//! ```

use super::{first_text, selector, Document};
use crate::error::{EnrichError, ParseError};
use crate::models::FeedItem;
use crate::utils::{join_names, parse_timestamp, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

static METADATA_SCRIPT: Lazy<Selector> = Lazy::new(|| selector("script#fusion-metadata"));
static GLOBAL_CONTENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)Fusion\.globalContent=(\{.*?\});").unwrap());

/// The raw JSON assigned to `Fusion.globalContent`, if the page has one.
pub(crate) fn payload(html: &Html) -> Option<String> {
    let script = first_text(html, &METADATA_SCRIPT)?;
    GLOBAL_CONTENT
        .captures(&script)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

pub(crate) fn extract(mut item: FeedItem, doc: &Document<'_>) -> Result<FeedItem, EnrichError> {
    let raw = payload(&doc.html).ok_or(ParseError::MissingPattern("Fusion.globalContent="))?;
    let data: Value = serde_json::from_str(&raw).map_err(|e| {
        debug!(preview = %truncate_for_log(&raw, 200), error = %e, "Unparsable Fusion payload");
        ParseError::json("Fusion.globalContent", e)
    })?;

    let result = data
        .get("result")
        .filter(|r| r.is_object())
        .ok_or(ParseError::MissingField("result"))?;
    let authors = result
        .get("authors")
        .and_then(Value::as_array)
        .ok_or(ParseError::MissingField("result.authors"))?;
    let taxonomy = result
        .get("taxonomy")
        .filter(|t| t.is_object())
        .ok_or(ParseError::MissingField("result.taxonomy"))?;

    let description = doc.renderer.render(result)?;

    if let Some(title) = result
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
    {
        item.title = title.to_string();
    }
    item.published_at = result
        .get("display_time")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);
    item.author = join_names(
        authors
            .iter()
            .filter_map(|a| a.get("name").and_then(Value::as_str)),
    );
    item.category = taxonomy
        .get("keywords")
        .and_then(Value::as_array)
        .map(|keywords| {
            keywords
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    item.description = description;

    Ok(item)
}
