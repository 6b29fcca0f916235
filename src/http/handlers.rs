//! Route handlers.

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        rejection::PathRejection,
        Multipart, Path, RawQuery, State,
    },
    http::StatusCode,
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::adapter::Source;
use crate::error::ConvertError;
use crate::http::response::{ErrorBody, Markdown};
use crate::http::server::AppState;
use crate::validate::validate_url;

/// Multipart part carrying the upload.
pub const FILE_FIELD: &str = "file";

const LANDING_PAGE: &str = include_str!("../../assets/index.html");

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
    })
}

pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// `GET /convert?url=...`
pub async fn convert_url_query(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Markdown, ConvertError> {
    let raw = url_param(query.as_deref()).unwrap_or_default();
    convert_url(&state, &raw).await
}

/// `GET /convert/` with nothing embedded.
pub async fn convert_url_empty() -> ConvertError {
    ConvertError::url_required()
}

/// `GET /convert/{*url}`; the request's query string belongs to the embedded URL.
pub async fn convert_url_path(
    State(state): State<AppState>,
    url: Result<Path<String>, PathRejection>,
    RawQuery(query): RawQuery,
) -> Result<Markdown, ConvertError> {
    let Path(url) = url.map_err(|e| {
        tracing::debug!(error = %e, "Undecodable URL path");
        ConvertError::InvalidUrl("Invalid URL".to_string())
    })?;

    let raw = match query {
        Some(query) if !query.is_empty() => format!("{url}?{query}"),
        _ => url,
    };
    convert_url(&state, &raw).await
}

/// Unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            detail: "Not Found".to_string(),
        }),
    )
}

/// Value of the `url` query parameter; the last one wins when repeated.
fn url_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == "url")
        .last()
        .map(|(_, value)| value.into_owned())
}

async fn convert_url(state: &AppState, raw: &str) -> Result<Markdown, ConvertError> {
    if raw.is_empty() {
        return Err(ConvertError::url_required());
    }

    let url = validate_url(raw)?;
    let source = Source::Url(url);

    match state.adapter.convert(&source).await {
        Ok(text) => Ok(Markdown(text)),
        Err(e) => {
            tracing::error!(url = %source.locator(), error = ?e, "Failed to convert URL");
            Err(e)
        }
    }
}

/// `POST /convert` with a multipart `file` part.
pub async fn convert_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Markdown, ConvertError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Upload is not multipart");
        ConvertError::MissingFile
    })?;

    let limit = state.uploads.max_bytes();
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(ConvertError::MissingFile);
        }

        let bytes = read_capped(&mut field, limit).await?;
        return state.uploads.handle(&filename, bytes).await.map(Markdown);
    }

    Err(ConvertError::MissingFile)
}

/// Read a field, buffering at most just past `limit` bytes but draining the rest.
async fn read_capped(field: &mut Field<'_>, limit: usize) -> Result<Vec<u8>, ConvertError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        if bytes.len() <= limit {
            bytes.extend_from_slice(&chunk);
        }
    }
    Ok(bytes)
}

fn multipart_error(e: MultipartError, limit: usize) -> ConvertError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %e, limit, "Upload exceeded request body limit");
        ConvertError::PayloadTooLarge { limit }
    } else {
        tracing::debug!(error = %e, "Malformed multipart body");
        ConvertError::MissingFile
    }
}
