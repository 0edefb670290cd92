//! Document ingestion: extract, chunk, embed, persist.

use crate::error::Result;
use crate::retrieval::VectorStore;
use docqa_context::TextSplitter;
use std::path::{Path, PathBuf};

/// Counts reported after a successful ingestion.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct IngestReport {
    /// Extracted units (pages for PDF, one for txt/docx).
    pub units: usize,
    /// Chunks embedded and stored.
    pub chunks: usize,
}

/// Runs a document through the full ingestion path.
pub struct IngestPipeline {
    splitter: TextSplitter,
    store: VectorStore,
}

impl IngestPipeline {
    pub fn new(splitter: TextSplitter, store: VectorStore) -> Self {
        Self { splitter, store }
    }

    /// Extract `path`, chunk it, embed every chunk, and persist them all in
    /// one transaction. Nothing is written if extraction or embedding fails.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let units = docqa_extract::extract(path)?;
        tracing::info!("Loaded {} unit(s) from {}", units.len(), path.display());

        let chunks = self.splitter.chunk_units(&units);
        tracing::info!("Created {} chunks from {}", chunks.len(), path.display());

        let stored = self.store.persist(&chunks).await?;
        Ok(IngestReport {
            units: units.len(),
            chunks: stored,
        })
    }

    /// Ingest an uploaded file that lives at a temporary path, deleting the
    /// file afterwards whether ingestion succeeded or failed.
    pub async fn ingest_temp_file(&self, path: &Path) -> Result<IngestReport> {
        let _guard = TempFileGuard(path.to_path_buf());
        self.ingest_file(path).await
    }
}

/// Removes the wrapped file on drop, covering every exit path.
struct TempFileGuard(PathBuf);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.0) {
            tracing::warn!("Failed to remove temp file {}: {e}", self.0.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Collection;
    use async_trait::async_trait;
    use docqa_embed::{EmbeddingProvider, EmbeddingResult};
    use std::io::Write;
    use std::sync::Arc;

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed_text(&self, _text: &str) -> docqa_embed::Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_texts(&self, texts: &[String]) -> docqa_embed::Result<EmbeddingResult> {
            Ok(EmbeddingResult::new(vec![vec![1.0, 0.0]; texts.len()]))
        }

        fn provider_name(&self) -> &str {
            "fixed"
        }
    }

    async fn memory_pipeline() -> IngestPipeline {
        let collection = Collection::open_memory().await.unwrap();
        let store = VectorStore::new(collection, Arc::new(FixedEmbedder));
        IngestPipeline::new(TextSplitter::default(), store)
    }

    #[tokio::test]
    async fn ingest_file_reports_units_and_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "A small note about nothing in particular.").unwrap();

        let pipeline = memory_pipeline().await;
        let report = pipeline.ingest_file(&path).await.unwrap();

        assert_eq!(report.units, 1);
        assert_eq!(report.chunks, 1);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn temp_file_is_deleted_after_successful_ingestion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "Uploaded content.").unwrap();
        drop(file);

        let pipeline = memory_pipeline().await;
        pipeline.ingest_temp_file(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn temp_file_is_deleted_even_when_ingestion_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.exe");
        std::fs::write(&path, b"not really a document").unwrap();

        let pipeline = memory_pipeline().await;
        let result = pipeline.ingest_temp_file(&path).await;

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
