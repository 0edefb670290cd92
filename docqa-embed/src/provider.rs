//! Embedding provider implementations.

use crate::config::EmbedConfig;
use crate::error::{EmbedError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of embedding generation.
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// The generated embeddings, one per input text, in input order.
    pub embeddings: Vec<Vec<f32>>,
    /// The dimension of each embedding vector.
    pub dimension: usize,
}

impl EmbeddingResult {
    /// Create a result, inferring the dimension from the first vector.
    pub fn new(embeddings: Vec<Vec<f32>>) -> Self {
        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimension,
        }
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// Trait for embedding providers that map text to fixed-dimension vectors.
///
/// Implementations must be order-preserving: the i-th output vector embeds
/// the i-th input text, and every vector from one provider configuration has
/// the same dimensionality.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch processing).
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult>;

    /// Name/identifier of this provider.
    fn provider_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl EmbeddingsResponse {
    /// Restore input order from the per-item `index` field and validate that
    /// the service returned exactly one vector per input, all of one
    /// dimension.
    fn into_ordered_vectors(mut self, expected: usize) -> Result<Vec<Vec<f32>>> {
        if self.data.len() != expected {
            return Err(EmbedError::malformed(format!(
                "expected {} embeddings, got {}",
                expected,
                self.data.len()
            )));
        }
        self.data.sort_by_key(|d| d.index);

        let dimension = self.data.first().map(|d| d.embedding.len()).unwrap_or(0);
        for (position, datum) in self.data.iter().enumerate() {
            if datum.index != position {
                return Err(EmbedError::malformed(format!(
                    "missing embedding for input {position}"
                )));
            }
            if datum.embedding.len() != dimension {
                return Err(EmbedError::malformed(format!(
                    "inconsistent dimensions: {} vs {}",
                    dimension,
                    datum.embedding.len()
                )));
            }
        }

        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Embedding provider backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct OpenAiEmbeddingProvider {
    config: EmbedConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiEmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbeddingProvider")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("verify_tls", &self.config.verify_tls)
            .finish()
    }
}

impl OpenAiEmbeddingProvider {
    /// Build a provider from explicit configuration. The HTTP client is
    /// constructed here so the TLS-verification choice applies to every call.
    pub fn new(config: EmbedConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(EmbedError::invalid_config("endpoint must not be empty"));
        }
        if config.batch_size == 0 {
            return Err(EmbedError::invalid_config("batch_size must be at least 1"));
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self { config, client })
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.config.base_url());
        let request = EmbeddingsRequest {
            model: &self.config.model,
            input: batch,
        };

        tracing::debug!("Requesting embeddings for batch of {} texts", batch.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbedError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingsResponse = response.json().await?;
        body.into_ordered_vectors(batch.len())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let texts = vec![text.to_string()];
        let result = self.embed_texts(&texts).await?;
        result
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::malformed("no embedding generated for text"))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        if texts.is_empty() {
            return Ok(EmbeddingResult::new(vec![]));
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.config.batch_size) {
            let vectors = self.embed_batch(batch).await?;
            all_embeddings.extend(vectors);
        }

        let result = EmbeddingResult::new(all_embeddings);
        for embedding in &result.embeddings {
            if embedding.len() != result.dimension {
                return Err(EmbedError::malformed(
                    "dimension changed between batches".to_string(),
                ));
            }
        }

        tracing::debug!(
            "Generated {} embeddings of dimension {}",
            result.len(),
            result.dimension
        );
        Ok(result)
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}
