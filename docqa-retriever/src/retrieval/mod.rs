//! Retrieval layer: vector persistence, similarity search, top-k queries.

pub mod retriever;
pub mod vector_store;

pub use retriever::{DEFAULT_TOP_K, RepositoryConfig, Retriever};
pub use vector_store::{SearchResult, VectorStore, cosine_similarity};
