//! Grounded answer generation from retrieved chunks.

use crate::error::{Result, RetrievalError};
use crate::llm::CompletionClient;
use crate::storage::ChunkRecord;
use std::sync::Arc;

/// Returned verbatim when retrieval finds nothing; no LLM call is made.
pub const NO_RESULTS_MESSAGE: &str =
    "No relevant documents found in the knowledge base for your query.";

/// Builds a grounding prompt from retrieved chunks and asks the LLM.
///
/// Grounding is prompt-level only: the model is instructed to answer from the
/// supplied context, but its output is returned unmodified and unverified.
pub struct AnswerGenerator {
    client: Arc<dyn CompletionClient>,
}

impl AnswerGenerator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Answer `query` from `chunks`. An empty chunk list short-circuits to
    /// [`NO_RESULTS_MESSAGE`] without touching the LLM; a blank query is an
    /// [`RetrievalError::EmptyInput`].
    pub async fn generate(&self, query: &str, chunks: &[ChunkRecord]) -> Result<String> {
        if query.trim().is_empty() {
            return Err(RetrievalError::EmptyInput);
        }
        if chunks.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let context = chunks
            .iter()
            .map(|c| c.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Answer the question using ONLY the context provided below.\n\
             If the answer is not contained in the context, say \"I don't have enough information to answer this.\"\n\
             \n\
             Context:\n\
             {context}\n\
             \n\
             Question:\n\
             {query}\n\
             \n\
             Answer:"
        );

        tracing::debug!(
            "Generating answer from {} chunks ({} context bytes)",
            chunks.len(),
            context.len()
        );
        self.client.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(&self, user_prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {user_prompt}"))
        }
    }

    fn record(content: &str) -> ChunkRecord {
        ChunkRecord {
            id: 1,
            source: "doc.txt".into(),
            unit_index: 0,
            unit_format: "txt".into(),
            chunk_index: 0,
            content: content.into(),
            embedding: vec![0.0],
        }
    }

    #[tokio::test]
    async fn empty_chunks_return_the_sentinel_without_an_llm_call() {
        let client = Arc::new(RecordingClient {
            calls: AtomicUsize::new(0),
        });
        let generator = AnswerGenerator::new(client.clone());

        let answer = generator.generate("what is this?", &[]).await.unwrap();
        assert_eq!(answer, NO_RESULTS_MESSAGE);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn blank_query_is_rejected() {
        let client = Arc::new(RecordingClient {
            calls: AtomicUsize::new(0),
        });
        let generator = AnswerGenerator::new(client.clone());

        let err = generator.generate("  ", &[record("ctx")]).await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmptyInput));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prompt_contains_context_question_and_grounding_instruction() {
        let client = Arc::new(RecordingClient {
            calls: AtomicUsize::new(0),
        });
        let generator = AnswerGenerator::new(client.clone());

        let chunks = [record("Rust has ownership."), record("Borrowing is checked.")];
        let answer = generator
            .generate("How does Rust manage memory?", &chunks)
            .await
            .unwrap();

        assert!(answer.contains("Answer the question using ONLY the context provided below."));
        assert!(answer.contains("Rust has ownership.\n\nBorrowing is checked."));
        assert!(answer.contains("Question:\nHow does Rust manage memory?"));
        assert!(answer.ends_with("Answer:"));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }
}
