//! Error types for the enrichment pipeline.
//!
//! Three failure families exist, one per collaborator:
//! - [`FetchError`]: reaching an article page failed
//! - [`ParseError`]: a page did not carry the structure a strategy expects
//! - [`TemplateError`]: the embedded article payload could not be rendered
//!
//! [`EnrichError`] wraps all three so a single item's failure can travel
//! through the cache and be reported by the orchestrator.

use thiserror::Error;

/// Failure while fetching a page.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connect, body read, timeout).
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The URL could not be parsed.
    #[error("invalid URL {0:?}")]
    InvalidUrl(String),
}

impl FetchError {
    pub fn request(url: impl Into<String>, err: impl std::fmt::Display) -> Self {
        FetchError::Request {
            url: url.into(),
            message: err.to_string(),
        }
    }
}

/// An expected structural signal was missing or malformed.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("no element matches {0:?}")]
    MissingElement(&'static str),

    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("pattern {0:?} not found in page source")]
    MissingPattern(&'static str),

    #[error("malformed JSON in {context}: {message}")]
    Json {
        context: &'static str,
        message: String,
    },
}

impl ParseError {
    pub fn json(context: &'static str, err: impl std::fmt::Display) -> Self {
        ParseError::Json {
            context,
            message: err.to_string(),
        }
    }
}

/// Rendering a description from a structured payload failed.
#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("template input is missing {0:?}")]
    MissingField(&'static str),

    #[error("template input field {0:?} has the wrong shape")]
    InvalidField(&'static str),

    #[error("failed to format template output: {0}")]
    Format(String),
}

impl From<std::fmt::Error> for TemplateError {
    fn from(err: std::fmt::Error) -> Self {
        TemplateError::Format(err.to_string())
    }
}

/// Per-item enrichment failure.
#[derive(Debug, Clone, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
