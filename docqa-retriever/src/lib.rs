//! docqa-retriever: retrieval-augmented question answering over documents
//!
//! This crate ties the pipeline together: documents are extracted
//! (docqa-extract), chunked (docqa-context), embedded (docqa-embed), and
//! stored in a SQLite collection here. Queries embed the question, rank
//! stored chunks by cosine similarity, and ask a chat model for an answer
//! grounded in the retrieved text.
//!
//! ## Key Modules
//!
//! - **[`storage`]**: SQLite chunk collection with a fixed embedding dimension
//! - **[`retrieval`]**: vector persistence, similarity search, top-k queries
//! - **[`pipeline`]**: extract → chunk → embed → persist ingestion
//! - **[`llm`]** / **[`answer`]**: chat-completion client and grounded
//!   answer generation
//! - **[`config`]**: the TOML file the `docqa` CLI runs from
//!
//! ## Architecture
//!
//! ```text
//! Files → Extract → Chunk → Embed → SQLite Collection
//!                                        ↓
//! Query → Embed → Cosine Search → Grounding Prompt → LLM → Answer
//! ```

pub mod answer;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod retrieval;
pub mod storage;

pub use answer::{AnswerGenerator, NO_RESULTS_MESSAGE};
pub use config::AppConfig;
pub use error::{Result, RetrievalError};
pub use llm::{ChatClient, CompletionClient, LlmConfig};
pub use pipeline::{IngestPipeline, IngestReport};
pub use retrieval::{RepositoryConfig, Retriever, SearchResult, VectorStore};
pub use storage::{ChunkRecord, Collection, CollectionStats, NewChunk};
