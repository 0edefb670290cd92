//! Error types for text extraction.

use std::path::PathBuf;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Errors raised while turning a source file into document units.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The file extension is not one we can extract. Raised before any file I/O.
    #[error("Unsupported file type: '{extension}'. Supported: .txt, .pdf, .docx, .doc")]
    UnsupportedFormat { extension: String },

    /// The underlying loader could not parse the file (corrupt, wrong encoding).
    #[error("Failed to extract '{path}': {source}")]
    ExtractionFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The file could not be read at all.
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Wrap a loader error with the path it came from.
    pub fn extraction<E>(path: &std::path::Path, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ExtractionFailure {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }
}
