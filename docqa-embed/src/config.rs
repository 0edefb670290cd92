//! Configuration for the remote embedding service.

use derive_builder::Builder;

/// Connection settings for an OpenAI-compatible embedding endpoint.
///
/// Constructed once at startup and passed by reference into the provider;
/// nothing in this crate reads ambient/global configuration.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct EmbedConfig {
    /// Base URL of the service, e.g. `https://api.example.com/v1`.
    pub endpoint: String,
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Embedding model identifier.
    pub model: String,
    /// Verify the server's TLS certificate. Disable only for self-signed or
    /// corporate-proxy endpoints.
    #[builder(default = "true")]
    pub verify_tls: bool,
    /// Maximum number of inputs sent per request.
    #[builder(default = "32")]
    pub batch_size: usize,
}

impl EmbedConfig {
    /// Create a configuration using the builder.
    pub fn builder() -> EmbedConfigBuilder {
        EmbedConfigBuilder::default()
    }

    /// Convenience constructor with default TLS verification and batch size.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        EmbedConfigBuilder::default()
            .endpoint(endpoint)
            .api_key(api_key)
            .model(model)
            .build()
            .expect("Failed to build EmbedConfig")
    }

    /// Endpoint with any trailing slash removed, ready for path joining.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}
