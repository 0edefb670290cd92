//! Top-k chunk retrieval over a persistent collection.

use crate::error::Result;
use crate::retrieval::vector_store::VectorStore;
use crate::storage::{ChunkRecord, Collection};
use docqa_embed::EmbeddingProvider;
use std::path::PathBuf;
use std::sync::Arc;

/// Default number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 5;

/// Where the collection lives and how many chunks a query returns.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    pub collection_path: PathBuf,
    pub top_k: usize,
}

impl RepositoryConfig {
    pub fn new(collection_path: impl Into<PathBuf>) -> Self {
        Self {
            collection_path: collection_path.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }
}

/// Fetches the chunks most relevant to a query, dropping the scores.
pub struct Retriever {
    store: VectorStore,
    top_k: usize,
}

impl Retriever {
    /// Open the collection at `config.collection_path` and wrap it.
    pub async fn open(
        config: &RepositoryConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let collection = Collection::open(&config.collection_path).await?;
        Ok(Self {
            store: VectorStore::new(collection, embedder),
            top_k: config.top_k,
        })
    }

    /// Wrap an already-open store, for in-memory use.
    pub fn new(store: VectorStore, top_k: usize) -> Self {
        Self { store, top_k }
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// The configured number of most-similar chunks, best first.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ChunkRecord>> {
        let results = self.store.search(query, self.top_k).await?;
        Ok(results.into_iter().map(|r| r.record).collect())
    }
}
