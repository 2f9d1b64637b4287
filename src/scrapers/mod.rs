//! Article page extraction strategies.
//!
//! A fetched article page is classified into exactly one [`Strategy`] and
//! the matching extractor overwrites the item's title, publication date,
//! author, category and description.
//!
//! # Strategies
//!
//! Checked in priority order; the first match wins and is committed even
//! if its field extraction fails afterwards:
//!
//! | Strategy | Signal | Module |
//! |----------|--------|--------|
//! | Investigative report | final URL under the investigations section | `investigates` |
//! | Embedded JSON | `script#fusion-metadata` carrying `Fusion.globalContent=` | `fusion` |
//! | Fallback scrape | anything else | `fallback` |
//!
//! Stripping of boilerplate elements always happens on a cloned document so
//! that the order of removals never affects other fields.

mod fallback;
mod fusion;
mod investigates;

use crate::error::EnrichError;
use crate::models::{FeedItem, FetchedPage};
use crate::template::{ArticleTemplate, DescriptionRenderer};
use scraper::{Html, Selector};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// URL prefix of the publisher's long-form investigations section.
pub const INVESTIGATIONS_PREFIX: &str = "https://www.reuters.com/investigates/";

/// The closed set of extraction strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    InvestigativeReport,
    EmbeddedJson,
    FallbackScrape,
}

impl Strategy {
    /// Classification order.
    const PRIORITY: [Strategy; 3] = [
        Strategy::InvestigativeReport,
        Strategy::EmbeddedJson,
        Strategy::FallbackScrape,
    ];

    fn matches(self, doc: &Document<'_>, investigations_prefix: &str) -> bool {
        match self {
            Strategy::InvestigativeReport => doc.page.final_url.starts_with(investigations_prefix),
            Strategy::EmbeddedJson => fusion::payload(&doc.html).is_some(),
            Strategy::FallbackScrape => true,
        }
    }

    fn extract(self, item: FeedItem, doc: &Document<'_>) -> Result<FeedItem, EnrichError> {
        match self {
            Strategy::InvestigativeReport => investigates::extract(item, doc),
            Strategy::EmbeddedJson => fusion::extract(item, doc),
            Strategy::FallbackScrape => fallback::extract(item, doc),
        }
    }
}

/// A fetched page together with its parsed document and the renderer the
/// strategies may need.
pub struct Document<'a> {
    pub page: &'a FetchedPage,
    pub html: Html,
    pub renderer: &'a dyn DescriptionRenderer,
}

/// Classifies fetched pages and runs the matching strategy.
#[derive(Clone)]
pub struct Extractor {
    investigations_prefix: String,
    renderer: Arc<dyn DescriptionRenderer>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(INVESTIGATIONS_PREFIX, Arc::new(ArticleTemplate))
    }
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("investigations_prefix", &self.investigations_prefix)
            .finish_non_exhaustive()
    }
}

impl Extractor {
    pub fn new(
        investigations_prefix: impl Into<String>,
        renderer: Arc<dyn DescriptionRenderer>,
    ) -> Self {
        Self {
            investigations_prefix: investigations_prefix.into(),
            renderer,
        }
    }

    fn document<'a>(&'a self, page: &'a FetchedPage) -> Document<'a> {
        Document {
            page,
            html: Html::parse_document(&page.raw_html),
            renderer: self.renderer.as_ref(),
        }
    }

    fn classify_document(&self, doc: &Document<'_>) -> Strategy {
        Strategy::PRIORITY
            .into_iter()
            .find(|s| s.matches(doc, &self.investigations_prefix))
            .unwrap_or(Strategy::FallbackScrape)
    }

    /// Pick the strategy that applies to `page`.
    pub fn classify(&self, page: &FetchedPage) -> Strategy {
        self.classify_document(&self.document(page))
    }

    /// Enrich a copy of `item` from `page`.
    ///
    /// Pure in `(item, page)`: the same inputs always produce the same output.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Parse`] when the selected strategy does not
    /// find the structure it requires, and [`EnrichError::Template`] when the
    /// embedded payload cannot be rendered.
    #[instrument(level = "debug", skip_all, fields(url = %page.final_url))]
    pub fn enrich(&self, item: &FeedItem, page: &FetchedPage) -> Result<FeedItem, EnrichError> {
        let doc = self.document(page);
        let strategy = self.classify_document(&doc);
        debug!(?strategy, "Selected extraction strategy");
        strategy.extract(item.clone(), &doc)
    }
}

/// Parse a CSS selector known at compile time.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Detach every element matching `selector` from `html`.
pub(crate) fn strip(html: &mut Html, selector: &Selector) {
    let ids: Vec<_> = html.select(selector).map(|el| el.id()).collect();
    for id in ids {
        if let Some(mut node) = html.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Concatenated text of the first element matching `selector`.
pub(crate) fn first_text(html: &Html, selector: &Selector) -> Option<String> {
    html.select(selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const FUSION_SCRIPT: &str = r#"<script id="fusion-metadata">window.Fusion=window.Fusion||{};Fusion.globalContent={"result":{"title":"T","display_time":"2024-01-01T00:00:00Z","authors":[{"name":"A"}],"taxonomy":{"keywords":["k"]},"content_elements":[{"type":"paragraph","content":"Body"}]}};Fusion.spa=false;</script>"#;

    const LD_JSON_SCRIPT: &str = r#"<script type="application/ld+json">{"headline":"Report","dateCreated":"2023-06-01T12:00:00Z","creator":"Reporter","keywords":["probe"]}</script>"#;

    fn item() -> FeedItem {
        FeedItem {
            title: "Listing title".to_string(),
            link: "https://www.reuters.com/world/x/".to_string(),
            guid: "A1".to_string(),
            author: "Listing author".to_string(),
            description: "Listing summary".to_string(),
            ..Default::default()
        }
    }

    fn page(url: &str, body: &str) -> FetchedPage {
        FetchedPage::new(url, format!("<html><head></head><body>{body}</body></html>"))
    }

    #[test]
    fn test_classify_fusion_page() {
        let p = page("https://www.reuters.com/world/x/", FUSION_SCRIPT);
        assert_eq!(Extractor::default().classify(&p), Strategy::EmbeddedJson);
    }

    #[test]
    fn test_classify_plain_page_falls_back() {
        let p = page("https://www.reuters.com/world/x/", "<article><p>Hi</p></article>");
        assert_eq!(Extractor::default().classify(&p), Strategy::FallbackScrape);
    }

    #[test]
    fn test_investigations_url_wins_over_fusion_block() {
        let body = format!(
            "{LD_JSON_SCRIPT}{FUSION_SCRIPT}<div class=\"special-report-article-container\"><p>Long read</p></div>"
        );
        let p = page("https://www.reuters.com/investigates/special-report/x/", &body);
        let extractor = Extractor::default();
        assert_eq!(extractor.classify(&p), Strategy::InvestigativeReport);

        let enriched = extractor.enrich(&item(), &p).unwrap();
        assert_eq!(enriched.title, "Report");
        assert_eq!(enriched.author, "Reporter");
        assert_eq!(enriched.description, "<p>Long read</p>");
    }

    #[test]
    fn test_ld_json_outside_investigations_does_not_trigger_report() {
        let body = format!("{LD_JSON_SCRIPT}{FUSION_SCRIPT}");
        let p = page("https://www.reuters.com/world/x/", &body);
        assert_eq!(Extractor::default().classify(&p), Strategy::EmbeddedJson);
    }

    #[test]
    fn test_enrich_fusion_example() {
        let p = page("https://www.reuters.com/world/x/", FUSION_SCRIPT);
        let enriched = Extractor::default().enrich(&item(), &p).unwrap();

        assert_eq!(enriched.title, "T");
        assert_eq!(enriched.author, "A");
        assert_eq!(enriched.category, vec!["k".to_string()]);
        assert_eq!(
            enriched.published_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(enriched.description, "<p>Body</p>\n");
        assert_eq!(enriched.guid, "A1");
        assert_eq!(enriched.link, "https://www.reuters.com/world/x/");
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let extractor = Extractor::default();
        let p = page("https://www.reuters.com/world/x/", FUSION_SCRIPT);
        let first = extractor.enrich(&item(), &p).unwrap();
        let second = extractor.enrich(&item(), &p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_committed_strategy_does_not_fall_back() {
        // Fusion signal present but payload is not valid JSON; the page also
        // carries everything the fallback scrape would need.
        let body = r#"<script id="fusion-metadata">Fusion.globalContent={"result": nope};</script>
            <meta property="og:title" content="OG">
            <script>{"datePublished":"2024-01-01T00:00:00Z","dateModified":"x"}{"@type":"Person","name":"P"}</script>
            <article><p>Text</p></article>"#;
        let p = page("https://www.reuters.com/world/x/", body);
        let err = Extractor::default().enrich(&item(), &p).unwrap_err();
        assert!(matches!(err, EnrichError::Parse(_)));
    }

    struct FixedRenderer;

    impl DescriptionRenderer for FixedRenderer {
        fn render(&self, _result: &serde_json::Value) -> Result<String, crate::error::TemplateError> {
            Ok("rendered".to_string())
        }
    }

    #[test]
    fn test_custom_renderer_and_prefix() {
        let extractor = Extractor::new("https://example.com/longform/", Arc::new(FixedRenderer));
        let p = page("https://www.reuters.com/world/x/", FUSION_SCRIPT);
        assert_eq!(extractor.enrich(&item(), &p).unwrap().description, "rendered");

        let report = page("https://example.com/longform/story", LD_JSON_SCRIPT);
        assert_eq!(extractor.classify(&report), Strategy::InvestigativeReport);
    }

    #[test]
    fn test_strip_removes_nested_matches() {
        let mut html = Html::parse_fragment(
            r#"<div class="keep"><span class="drop">a<span class="drop">b</span></span>c</div>"#,
        );
        strip(&mut html, &selector(".drop"));
        let keep = html.select(&selector(".keep")).next().unwrap();
        assert_eq!(keep.inner_html(), "c");
    }
}
