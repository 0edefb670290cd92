//! Plain-text loader: the whole file becomes a single document unit.

use crate::{DocumentUnit, ExtractError, Result, SourceFormat};
use std::path::Path;

pub fn load(path: &Path) -> Result<Vec<DocumentUnit>> {
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8(bytes).map_err(|e| ExtractError::extraction(path, e))?;
    Ok(vec![DocumentUnit::new(content, path, 0, SourceFormat::Text)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_utf8_content_is_an_extraction_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        std::fs::write(&path, [0x68, 0x65, 0xE9, 0x6C]).unwrap();

        assert!(matches!(
            load(&path),
            Err(ExtractError::ExtractionFailure { .. })
        ));
    }

    #[test]
    fn empty_file_yields_one_empty_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let units = load(&path).unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].content.is_empty());
    }
}
