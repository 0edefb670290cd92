//! Error types for storage, retrieval, and answer generation.

/// Result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors raised by the retrieval pipeline.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// A query or prompt was empty or all-whitespace.
    #[error("Input text must not be empty")]
    EmptyInput,

    /// An appended embedding does not match the collection's dimension.
    #[error("Embedding dimension mismatch: collection stores {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A stored embedding BLOB could not be decoded.
    #[error("Corrupt embedding for chunk {id}: {message}")]
    CorruptEmbedding { id: i64, message: String },

    #[error(transparent)]
    Extract(#[from] docqa_extract::ExtractError),

    #[error(transparent)]
    Embed(#[from] docqa_embed::EmbedError),

    #[error("HTTP client error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Database error: {source}")]
    Database {
        #[from]
        source: sqlx::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
