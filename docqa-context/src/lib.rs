//! Chunking for the docqa ingestion pipeline.
//!
//! Document units are split into overlapping chunks sized for the embedding
//! model's input window. See [`text::TextSplitter`] for the algorithm.

pub mod text;

pub use text::{Chunk, ChunkMetadata, TextSplitter, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
