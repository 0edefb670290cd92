//! Embedding-backed chunk persistence and similarity search.

use crate::error::{Result, RetrievalError};
use crate::storage::{ChunkRecord, Collection, NewChunk};
use docqa_context::Chunk;
use docqa_embed::EmbeddingProvider;
use std::sync::Arc;

/// A chunk matched by a search, with its cosine similarity to the query.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub record: ChunkRecord,
    pub score: f32,
}

/// Couples a [`Collection`] with an [`EmbeddingProvider`].
///
/// Persisting embeds the whole batch before anything is written, so an
/// embedding failure leaves the collection untouched. Search is brute-force
/// cosine similarity over every stored chunk, which is adequate for the
/// single-node collection sizes this serves.
#[derive(Clone)]
pub struct VectorStore {
    collection: Collection,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl VectorStore {
    pub fn new(collection: Collection, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            collection,
            embedder,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Embed `chunks` and insert them in one transaction. Returns the number
    /// of chunks stored. An empty slice stores nothing and makes no network
    /// calls.
    pub async fn persist(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let result = self.embedder.embed_texts(&texts).await?;

        let new_chunks: Vec<NewChunk> = chunks
            .iter()
            .zip(result.embeddings)
            .map(|(chunk, embedding)| NewChunk {
                source: chunk.metadata.source.clone(),
                unit_index: chunk.metadata.unit_index,
                unit_format: chunk.metadata.format.to_string(),
                chunk_index: chunk.metadata.chunk_index,
                content: chunk.content.clone(),
                embedding,
            })
            .collect();

        let stored = self.collection.append(&new_chunks).await?;
        tracing::info!(
            "Persisted {} chunks at dimension {}",
            stored,
            result.dimension
        );
        Ok(stored)
    }

    /// Return the `k` most similar chunks to `query`, best first.
    ///
    /// Ties in score resolve to the earlier-inserted chunk. A blank query is
    /// an [`RetrievalError::EmptyInput`]; an empty collection yields an empty
    /// result without calling the embedding service.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyInput);
        }

        let records = self.collection.all_chunks().await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_text(query).await?;

        let mut results: Vec<SearchResult> = records
            .into_iter()
            .map(|record| {
                let score = cosine_similarity(&query_embedding, &record.embedding);
                SearchResult { record, score }
            })
            .collect();

        // Stable sort: records arrive in insertion order, so equal scores
        // keep the earlier-inserted chunk first.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(k);

        tracing::debug!("Search returned {} results", results.len());
        Ok(results)
    }
}

/// Cosine similarity between two vectors. Mismatched lengths or a zero-norm
/// vector score 0.0 rather than erroring.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot_product = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (&x, &y) in a.iter().zip(b.iter()) {
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_score_one() {
        let v = vec![0.3, -0.7, 0.2];
        let score = cosine_similarity(&v, &v);
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_score_zero() {
        let score = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn opposite_vectors_score_negative_one() {
        let score = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_lengths_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn zero_norm_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
