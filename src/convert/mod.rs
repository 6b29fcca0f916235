//! Document conversion engine.
//!
//! # Data Flow
//! ```text
//! locator (URL or filesystem path)
//!     → fetch.rs (HTTP GET, size-capped) | tokio::fs::read
//!     → formats.rs (detect by content type, extension, magic bytes)
//!     → formats.rs (render on the blocking pool)
//!     → ConversionOutput
//! ```
//!
//! Callers only see [`DocumentConverter`]; the request path goes through
//! `crate::adapter`, which owns the shared instance.

pub mod engine;
pub mod fetch;
pub mod formats;

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub use engine::MarkdownEngine;
pub use formats::Format;

/// Result of a single conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutput {
    /// Document title when the format carries one (HTML `<title>`).
    pub title: Option<String>,
    /// The Markdown body.
    pub text_content: String,
}

impl ConversionOutput {
    pub fn new(text_content: impl Into<String>) -> Self {
        Self {
            title: None,
            text_content: text_content.into(),
        }
    }
}

/// Errors raised by the conversion engine.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// The remote resource could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The remote resource answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    /// The source is larger than the engine accepts.
    #[error("{what} exceeds the {limit} byte limit")]
    TooLarge { what: String, limit: usize },

    /// A local file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No handler exists for the detected (or undetectable) format.
    #[error("unsupported format: {0}")]
    Unsupported(String),

    /// The content did not parse as the detected format.
    #[error("invalid {format} content: {message}")]
    Parse { format: &'static str, message: String },

    /// Text extraction from a PDF failed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// A background conversion task was cancelled or panicked.
    #[error("conversion task failed: {0}")]
    Task(String),
}

/// Single-entry-point document conversion.
///
/// `locator` is either an `http(s)://` URL or a filesystem path.
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, locator: &str) -> Result<ConversionOutput, ConverterError>;
}

/// Check if the locator looks like a URL rather than a path.
pub fn is_url(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com"));
        assert!(!is_url("/tmp/upload.pdf"));
        assert!(!is_url("report.docx"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_error_display() {
        let err = ConverterError::Http {
            url: "https://example.com/missing".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "https://example.com/missing returned HTTP 404");

        let err = ConverterError::Io {
            path: PathBuf::from("/tmp/x.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read /tmp/x.pdf: gone");
    }
}
