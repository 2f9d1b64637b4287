//! HTML description rendering for embedded article payloads.
//!
//! Article pages served by the publisher's rendering platform embed the
//! whole story as a JSON `result` object whose body is a list of typed
//! `content_elements`. [`ArticleTemplate`] turns that payload into an HTML
//! description; callers can plug a different [`DescriptionRenderer`] into
//! the [`crate::scrapers::Extractor`].

use crate::error::TemplateError;
use serde_json::Value;
use std::fmt::Write;

/// Renders an HTML string from a structured article payload.
pub trait DescriptionRenderer: Send + Sync {
    fn render(&self, result: &Value) -> Result<String, TemplateError>;
}

/// Default renderer: lead image followed by the article body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleTemplate;

impl DescriptionRenderer for ArticleTemplate {
    fn render(&self, result: &Value) -> Result<String, TemplateError> {
        if !result.is_object() {
            return Err(TemplateError::MissingField("result"));
        }
        let elements = match result.get("content_elements") {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(elements)) => elements.as_slice(),
            Some(_) => return Err(TemplateError::InvalidField("content_elements")),
        };

        let mut html = String::new();

        if let Some(lead) = result
            .pointer("/related_content/images/0")
            .filter(|img| str_field(img, "url").is_some())
        {
            write_figure(&mut html, lead)?;
        }

        for element in elements {
            match str_field(element, "type").unwrap_or_default() {
                "paragraph" => {
                    if let Some(content) = str_field(element, "content") {
                        writeln!(html, "<p>{}</p>", content)?;
                    }
                }
                "header" => {
                    let level = element
                        .get("level")
                        .and_then(Value::as_u64)
                        .unwrap_or(2)
                        .clamp(1, 6);
                    if let Some(content) = str_field(element, "content") {
                        writeln!(html, "<h{level}>{}</h{level}>", content)?;
                    }
                }
                "image" => write_figure(&mut html, element)?,
                "list" => write_list(&mut html, element)?,
                "raw_html" | "graphic" => {
                    if let Some(content) = str_field(element, "content") {
                        writeln!(html, "{}", content)?;
                    }
                }
                _ => {}
            }
        }

        Ok(html)
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn write_figure(html: &mut String, image: &Value) -> Result<(), TemplateError> {
    let Some(url) = str_field(image, "url") else {
        return Ok(());
    };
    let alt = str_field(image, "alt_text").unwrap_or_default();
    write!(
        html,
        "<figure><img src=\"{}\" alt=\"{}\">",
        escape_html(url),
        escape_html(alt)
    )?;
    if let Some(caption) = str_field(image, "caption") {
        write!(html, "<figcaption>{}</figcaption>", escape_html(caption))?;
    }
    writeln!(html, "</figure>")?;
    Ok(())
}

fn write_list(html: &mut String, list: &Value) -> Result<(), TemplateError> {
    let tag = match str_field(list, "list_type") {
        Some("ordered") => "ol",
        _ => "ul",
    };
    let items = list
        .get("items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    write!(html, "<{tag}>")?;
    for item in items {
        if let Some(content) = str_field(item, "content") {
            write!(html, "<li>{}</li>", content)?;
        }
    }
    writeln!(html, "</{tag}>")?;
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
