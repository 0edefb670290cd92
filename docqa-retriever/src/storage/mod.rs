//! Storage layer: the SQLite chunk collection.

pub mod collection;

pub use collection::{Collection, CollectionStats, ChunkRecord, NewChunk};
