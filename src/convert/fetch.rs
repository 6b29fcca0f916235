//! Outbound HTTP fetching for URL sources.

use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::ConverterError;

/// A downloaded resource.
#[derive(Debug)]
pub struct Fetched {
    /// URL after redirects.
    pub final_url: Url,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Fetched {
    /// Extension of the last path segment, if any.
    pub fn extension(&self) -> Option<&str> {
        let last = self.final_url.path_segments()?.next_back()?;
        let (stem, ext) = last.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }
}

/// GET `url`, failing on non-success status or when the body exceeds `max_bytes`.
pub async fn fetch(client: &reqwest::Client, url: &str, max_bytes: usize) -> Result<Fetched, ConverterError> {
    tracing::debug!(url = %url, "Fetching document");

    let fetch_error = |e: reqwest::Error| ConverterError::Fetch {
        url: url.to_string(),
        reason: e.to_string(),
    };

    let mut response = client.get(url).send().await.map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ConverterError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(len) = response.content_length() {
        if len > max_bytes as u64 {
            return Err(ConverterError::TooLarge {
                what: url.to_string(),
                limit: max_bytes,
            });
        }
    }

    let final_url = response.url().clone();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(fetch_error)? {
        if bytes.len() + chunk.len() > max_bytes {
            return Err(ConverterError::TooLarge {
                what: url.to_string(),
                limit: max_bytes,
            });
        }
        bytes.extend_from_slice(&chunk);
    }

    tracing::debug!(
        url = %final_url,
        content_type = ?content_type,
        size = bytes.len(),
        "Fetched document"
    );

    Ok(Fetched {
        final_url,
        content_type,
        bytes,
    })
}
