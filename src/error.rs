//! Request-level error taxonomy.
//!
//! Every failure a handler can surface is one of four kinds. The HTTP
//! mapping lives in `http::response`.

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

const MIB: usize = 1024 * 1024;

/// What a failed conversion was working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Url,
    File,
}

impl Subject {
    /// Metric label for this subject.
    pub fn as_label(self) -> &'static str {
        match self {
            Subject::Url => "url",
            Subject::File => "file",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Url => f.write_str("URL"),
            Subject::File => f.write_str("file"),
        }
    }
}

/// Errors returned to callers of the conversion endpoints.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The supplied URL is missing, malformed, or its host is not an FQDN.
    #[error("{0}")]
    InvalidUrl(String),

    /// The upload carried no file part or an empty filename.
    #[error("No file provided")]
    MissingFile,

    /// The upload exceeded the configured size limit.
    #[error("File too large. Maximum size is {}MB", .limit / MIB)]
    PayloadTooLarge { limit: usize },

    /// The conversion engine failed.
    #[error("Failed to convert {subject}: {message}")]
    ConversionFailed { subject: Subject, message: String },
}

impl ConvertError {
    pub fn url_required() -> Self {
        ConvertError::InvalidUrl("URL parameter is required".to_string())
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ConvertError::InvalidUrl(_) | ConvertError::MissingFile => StatusCode::BAD_REQUEST,
            ConvertError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ConvertError::ConversionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
