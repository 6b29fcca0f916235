//! Upload staging.
//!
//! An uploaded payload is written to a uniquely named temporary file that
//! keeps the declared file extension, converted from that path, and removed
//! afterwards. Removal is tied to [`StagedFile`]'s drop, so it happens on
//! every exit path including unwinding.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::adapter::{ConversionAdapter, Source};
use crate::error::{ConvertError, Subject};

/// Default maximum upload size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const TEMP_PREFIX: &str = "markit-";
const MAX_SUFFIX_LEN: usize = 16;

/// A temporary file holding one upload.
#[derive(Debug)]
pub struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    /// Create the temp file (in `dir`, or the system temp dir) and write `bytes` to it.
    ///
    /// Runs on the blocking pool.
    pub async fn write(
        declared_name: &str,
        bytes: Vec<u8>,
        dir: Option<PathBuf>,
    ) -> io::Result<Self> {
        let suffix = staging_suffix(declared_name);
        let size = bytes.len();

        let file = tokio::task::spawn_blocking(move || -> io::Result<NamedTempFile> {
            let mut builder = tempfile::Builder::new();
            builder.prefix(TEMP_PREFIX).suffix(&suffix);

            let mut file = match dir {
                Some(dir) => builder.tempfile_in(dir)?,
                None => builder.tempfile()?,
            };
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(io::Error::other)??;

        tracing::debug!(path = %file.path().display(), size, "Staged upload");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now, reporting failures instead of ignoring them on drop.
    pub fn close(self) -> io::Result<()> {
        self.file.close()
    }
}

/// Extension of the declared name as a temp-file suffix, e.g. `.pdf`.
///
/// Only the extension is kept; directory parts and the stem are discarded.
pub fn staging_suffix(declared_name: &str) -> String {
    Path::new(declared_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() < MAX_SUFFIX_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// Validates and converts uploaded files.
pub struct UploadHandler {
    adapter: ConversionAdapter,
    max_bytes: usize,
    temp_dir: Option<PathBuf>,
}

impl UploadHandler {
    pub fn new(adapter: ConversionAdapter, max_bytes: usize, temp_dir: Option<PathBuf>) -> Self {
        Self {
            adapter,
            max_bytes,
            temp_dir,
        }
    }

    /// Configured maximum payload size in bytes.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Convert one uploaded file to Markdown.
    pub async fn handle(&self, filename: &str, bytes: Vec<u8>) -> Result<String, ConvertError> {
        if filename.is_empty() {
            return Err(ConvertError::MissingFile);
        }
        if bytes.len() > self.max_bytes {
            tracing::warn!(filename = %filename, size = bytes.len(), limit = self.max_bytes, "Upload too large");
            return Err(ConvertError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        let staged = StagedFile::write(filename, bytes, self.temp_dir.clone())
            .await
            .map_err(|e| {
                tracing::error!(filename = %filename, error = %e, "Failed to stage upload");
                ConvertError::ConversionFailed {
                    subject: Subject::File,
                    message: format!("could not stage upload: {e}"),
                }
            })?;

        let result = self
            .adapter
            .convert(&Source::Path(staged.path().to_path_buf()))
            .await;

        let staged_path = staged.path().to_path_buf();
        if let Err(e) = staged.close() {
            tracing::warn!(path = %staged_path.display(), error = %e, "Failed to remove staged upload");
        }

        if let Err(ref e) = result {
            tracing::error!(filename = %filename, error = ?e, "Failed to convert file: {}", filename);
        }
        result
    }
}
