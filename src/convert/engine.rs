//! Default [`DocumentConverter`] implementation.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use super::fetch::fetch;
use super::formats::{self, Format};
use super::{is_url, ConversionOutput, ConverterError, DocumentConverter};
use crate::config::ConverterConfig;

/// Fetches URLs over HTTP, reads paths from disk, and renders by format.
#[derive(Debug, Clone)]
pub struct MarkdownEngine {
    client: reqwest::Client,
    max_fetch_bytes: usize,
}

impl MarkdownEngine {
    pub fn new(config: &ConverterConfig) -> Result<Self, ConverterError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.fetch_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build().map_err(|e| ConverterError::Fetch {
            url: String::new(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            max_fetch_bytes: config.max_fetch_bytes,
        })
    }

    async fn convert_url(&self, url: &str) -> Result<ConversionOutput, ConverterError> {
        let fetched = fetch(&self.client, url, self.max_fetch_bytes).await?;
        let format = formats::detect(
            fetched.content_type.as_deref(),
            fetched.extension(),
            &fetched.bytes,
        )
        .ok_or_else(|| unsupported(url, fetched.content_type.as_deref()))?;

        render_blocking(format, fetched.bytes).await
    }

    async fn convert_path(&self, path: &Path) -> Result<ConversionOutput, ConverterError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ConverterError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str());
        let format = formats::detect(None, extension, &bytes)
            .ok_or_else(|| unsupported(&path.display().to_string(), extension))?;

        render_blocking(format, bytes).await
    }
}

#[async_trait]
impl DocumentConverter for MarkdownEngine {
    async fn convert(&self, locator: &str) -> Result<ConversionOutput, ConverterError> {
        if is_url(locator) {
            self.convert_url(locator).await
        } else {
            self.convert_path(Path::new(locator)).await
        }
    }
}

async fn render_blocking(format: Format, bytes: Vec<u8>) -> Result<ConversionOutput, ConverterError> {
    tracing::debug!(format = format.label(), size = bytes.len(), "Rendering document");

    tokio::task::spawn_blocking(move || formats::render(format, &bytes))
        .await
        .map_err(|e| ConverterError::Task(e.to_string()))?
}

fn unsupported(source: &str, hint: Option<&str>) -> ConverterError {
    match hint {
        Some(hint) => ConverterError::Unsupported(format!("{source} ({hint})")),
        None => ConverterError::Unsupported(source.to_string()),
    }
}
