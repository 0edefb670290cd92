//! TOML configuration for the `docqa` CLI.

use anyhow::Context;
use docqa_context::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextSplitter};
use docqa_embed::EmbedConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::llm::LlmConfig;
use crate::retrieval::DEFAULT_TOP_K;

/// One config file drives the whole CLI; there is no ambient/env lookup.
///
/// ```toml
/// endpoint = "https://api.example.com/v1"
/// api_key = "sk-..."
/// llm_model = "gpt-4o-mini"
/// embedding_model = "text-embedding-3-small"
/// # verify_tls = true
/// # collection_path = "./collection"
/// # chunk_size = 1000
/// # chunk_overlap = 200
/// # top_k = 5
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub endpoint: String,
    pub api_key: String,
    pub llm_model: String,
    pub embedding_model: String,
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    #[serde(default = "default_collection_path")]
    pub collection_path: PathBuf,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_verify_tls() -> bool {
    true
}

fn default_collection_path() -> PathBuf {
    PathBuf::from("./collection")
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl AppConfig {
    /// Read and parse the config file, validating the chunking parameters.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;

        anyhow::ensure!(
            config.chunk_overlap < config.chunk_size,
            "chunk_overlap ({}) must be strictly less than chunk_size ({})",
            config.chunk_overlap,
            config.chunk_size
        );
        Ok(config)
    }

    pub fn embed_config(&self) -> EmbedConfig {
        EmbedConfig::builder()
            .endpoint(self.endpoint.clone())
            .api_key(self.api_key.clone())
            .model(self.embedding_model.clone())
            .verify_tls(self.verify_tls)
            .build()
            .expect("Failed to build EmbedConfig")
    }

    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig::builder()
            .endpoint(self.endpoint.clone())
            .api_key(self.api_key.clone())
            .model(self.llm_model.clone())
            .verify_tls(self.verify_tls)
            .build()
            .expect("Failed to build LlmConfig")
    }

    pub fn splitter(&self) -> TextSplitter {
        TextSplitter::new(self.chunk_size, self.chunk_overlap)
    }
}
