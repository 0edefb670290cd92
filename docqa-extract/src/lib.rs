//! Text extraction for the docqa ingestion pipeline.
//!
//! This crate turns a source file into a sequence of [`DocumentUnit`]s — one per
//! logically separable region of the file (a PDF page, a word-processor document,
//! a whole plain-text file). Dispatch is by file extension, and unsupported
//! extensions are rejected before the file is opened.
//!
//! Supported formats:
//!
//! - `.txt` — the whole file as a single unit (UTF-8)
//! - `.pdf` — one unit per page
//! - `.docx` / `.doc` — paragraphs joined into a single unit
//!
//! Loader failures (corrupt files, unreadable encodings) propagate to the caller
//! as [`ExtractError::ExtractionFailure`]; no retry is attempted here.

pub mod error;
pub mod pdf;
pub mod text;
pub mod word;

pub use error::{ExtractError, Result};

use serde::Serialize;
use std::path::Path;

/// Source formats this crate knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Text,
    Pdf,
    Word,
}

impl SourceFormat {
    /// Map a lowercase file extension to a format, if supported.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Word),
            _ => None,
        }
    }

    /// Short label stored in unit metadata.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Pdf => "pdf",
            Self::Word => "word",
        }
    }
}

/// Provenance attached to every extracted unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitMetadata {
    /// Path the unit was extracted from.
    pub source: String,
    /// Zero-based page/section index within the source file.
    pub index: usize,
    /// Format label (`"text"`, `"pdf"`, `"word"`).
    pub format: &'static str,
}

/// One logically separable region of a source file, e.g. one PDF page.
///
/// Units are immutable values: created here, consumed by the chunker, never
/// persisted standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentUnit {
    pub content: String,
    pub metadata: UnitMetadata,
}

impl DocumentUnit {
    pub fn new(content: String, source: &Path, index: usize, format: SourceFormat) -> Self {
        Self {
            content,
            metadata: UnitMetadata {
                source: source.to_string_lossy().into_owned(),
                index,
                format: format.label(),
            },
        }
    }
}

/// Extract all document units from `path`, dispatching on its extension.
///
/// The extension is inspected before any file I/O, so an unsupported format is
/// rejected fast with [`ExtractError::UnsupportedFormat`].
pub fn extract(path: &Path) -> Result<Vec<DocumentUnit>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = SourceFormat::from_extension(&extension)
        .ok_or(ExtractError::UnsupportedFormat { extension })?;

    let units = match format {
        SourceFormat::Text => text::load(path)?,
        SourceFormat::Pdf => pdf::load(path)?,
        SourceFormat::Word => word::load(path)?,
    };

    tracing::info!(
        "Loaded {} unit(s) from '{}' ({})",
        units.len(),
        path.display(),
        format.label()
    );
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_extension_is_rejected_before_extraction() {
        // The path does not even exist: dispatch must fail on the extension
        // alone, without touching the filesystem.
        let err = extract(Path::new("report.exe")).unwrap_err();
        match err {
            ExtractError::UnsupportedFormat { extension } => {
                assert_eq!(extension, "exe");
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn unsupported_error_names_extension_and_supported_list() {
        let err = extract(Path::new("notes.rtf")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'rtf'"));
        for supported in [".txt", ".pdf", ".docx", ".doc"] {
            assert!(message.contains(supported), "missing {supported}: {message}");
        }
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert!(matches!(
            extract(Path::new("README")),
            Err(ExtractError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn text_file_yields_single_unit_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "hello world").unwrap();

        let units = extract(&path).unwrap();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].content, "hello world");
        assert_eq!(units[0].metadata.index, 0);
        assert_eq!(units[0].metadata.format, "text");
        assert_eq!(units[0].metadata.source, path.to_string_lossy());
    }

    #[test]
    fn corrupt_pdf_propagates_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(matches!(
            extract(&path),
            Err(ExtractError::ExtractionFailure { .. })
        ));
    }
}
