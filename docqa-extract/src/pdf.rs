//! PDF loader: one document unit per page.
//!
//! Text extraction is delegated to pdf-extract; pages that contain no
//! extractable text (scanned images, empty pages) are kept as empty units so
//! page indexes stay aligned with the source document.

use crate::{DocumentUnit, ExtractError, Result, SourceFormat};
use std::path::Path;

pub fn load(path: &Path) -> Result<Vec<DocumentUnit>> {
    let bytes = std::fs::read(path)?;

    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| ExtractError::extraction(path, e))?;

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            DocumentUnit::new(normalize(&page), path, index, SourceFormat::Pdf)
        })
        .collect())
}

/// Strip null bytes and collapse the ragged whitespace pdf-extract produces.
fn normalize(raw: &str) -> String {
    raw.replace('\0', "")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
