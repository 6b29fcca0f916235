//! Conversion adapter: the single shared entry point into the engine.
//!
//! Built once at startup and cloned into every handler. Any engine failure,
//! including a panic inside the engine, comes back as
//! [`ConvertError::ConversionFailed`].

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::convert::DocumentConverter;
use crate::error::{ConvertError, Subject};
use crate::observability::metrics;
use crate::validate::ValidUrl;

/// What to convert.
#[derive(Debug, Clone)]
pub enum Source {
    Url(ValidUrl),
    Path(PathBuf),
}

impl Source {
    pub fn subject(&self) -> Subject {
        match self {
            Source::Url(_) => Subject::Url,
            Source::Path(_) => Subject::File,
        }
    }

    /// The locator string handed to the engine.
    pub fn locator(&self) -> Cow<'_, str> {
        match self {
            Source::Url(url) => Cow::Borrowed(url.as_str()),
            Source::Path(path) => path.to_string_lossy(),
        }
    }
}

/// Shared, read-only handle to the conversion engine.
#[derive(Clone)]
pub struct ConversionAdapter {
    engine: Arc<dyn DocumentConverter>,
}

impl ConversionAdapter {
    pub fn new(engine: Arc<dyn DocumentConverter>) -> Self {
        Self { engine }
    }

    /// Convert `source` to Markdown text.
    pub async fn convert(&self, source: &Source) -> Result<String, ConvertError> {
        let start = Instant::now();
        let subject = source.subject();
        let locator = source.locator().into_owned();

        // Run on its own task so a panicking engine surfaces as a JoinError.
        let engine = Arc::clone(&self.engine);
        let task = tokio::spawn(async move { engine.convert(&locator).await });

        let message = match task.await {
            Ok(Ok(output)) => {
                metrics::record_conversion(subject.as_label(), "success", start);
                tracing::debug!(
                    source = %source.locator(),
                    title = ?output.title,
                    chars = output.text_content.len(),
                    "Conversion succeeded"
                );
                return Ok(output.text_content);
            }
            Ok(Err(e)) => e.to_string(),
            Err(e) if e.is_panic() => "conversion engine panicked".to_string(),
            Err(e) => e.to_string(),
        };

        metrics::record_conversion(subject.as_label(), "failure", start);
        Err(ConvertError::ConversionFailed { subject, message })
    }
}
