//! Response types.
//!
//! Conversions return [`Markdown`]; failures render as
//! `{"detail": "<message>"}` with the status from [`ConvertError::status`].

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Content type for conversion results.
pub const TEXT_MARKDOWN: &str = "text/markdown; charset=utf-8";

/// A Markdown response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markdown(pub String);

impl IntoResponse for Markdown {
    fn into_response(self) -> Response {
        (
            [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_MARKDOWN))],
            self.0,
        )
            .into_response()
    }
}

/// Structured error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
