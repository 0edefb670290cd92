//! Error types for the embedding client.

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Errors raised while requesting embeddings from the remote service.
///
/// No retry or backoff is performed here; a failed call surfaces immediately
/// and the caller decides whether to try again.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The embedding service rejected the request (auth, quota, bad model).
    #[error("Embedding service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The request never completed (connect, TLS, timeout).
    #[error("Embedding request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// The service answered with a payload we could not use.
    #[error("Malformed embedding response: {message}")]
    MalformedResponse { message: String },

    /// The client configuration is unusable.
    #[error("Invalid embedding configuration: {message}")]
    InvalidConfig { message: String },
}

impl EmbedError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
