//! Embedding client for OpenAI-compatible services.
//!
//! This crate turns text into fixed-dimension vectors by calling a remote
//! `/embeddings` endpoint. It provides:
//!
//! - [`EmbedConfig`]: connection settings (endpoint, credential, model,
//!   TLS verification, batch size)
//! - [`EmbeddingProvider`]: the async trait the rest of the pipeline
//!   programs against
//! - [`OpenAiEmbeddingProvider`]: the HTTP implementation, batching large
//!   inputs and restoring response order
//!
//! ## Example
//!
//! ```no_run
//! use docqa_embed::{EmbedConfig, EmbeddingProvider, OpenAiEmbeddingProvider};
//!
//! # async fn example() -> docqa_embed::Result<()> {
//! let config = EmbedConfig::new("https://api.example.com/v1", "api-key", "text-embed-small");
//! let provider = OpenAiEmbeddingProvider::new(config)?;
//!
//! let texts = vec!["Hello world".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//! println!("embedded {} texts at dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;

pub use config::{EmbedConfig, EmbedConfigBuilder};
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult, OpenAiEmbeddingProvider};
