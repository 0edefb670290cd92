//! Chat-completion client for answer generation.
//!
//! Wraps an OpenAI-compatible `/chat/completions` endpoint behind the
//! [`CompletionClient`] trait. A failed call does not surface as an error:
//! the answer path degrades to a literal failure message so a flaky LLM
//! endpoint never breaks query handling. Only an empty prompt is rejected
//! up front.

use crate::error::{Result, RetrievalError};
use async_trait::async_trait;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// System role content sent with every completion request.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the user's question clearly and concisely.";

/// Connection settings for the chat-completion service.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct LlmConfig {
    /// Base URL of the service, e.g. `https://api.example.com/v1`.
    pub endpoint: String,
    /// Bearer credential sent with every request.
    pub api_key: String,
    /// Chat model identifier.
    pub model: String,
    /// Verify the server's TLS certificate.
    #[builder(default = "true")]
    pub verify_tls: bool,
}

impl LlmConfig {
    pub fn builder() -> LlmConfigBuilder {
        LlmConfigBuilder::default()
    }

    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        LlmConfigBuilder::default()
            .endpoint(endpoint)
            .api_key(api_key)
            .model(model)
            .build()
            .expect("Failed to build LlmConfig")
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

/// Trait seam over the chat-completion service, mockable in tests.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system+user exchange and return the assistant's reply.
    async fn complete(&self, user_prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// HTTP implementation of [`CompletionClient`].
pub struct ChatClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;
        Ok(Self { config, client })
    }

    async fn call(&self, user_prompt: &str) -> std::result::Result<String, String> {
        let url = format!("{}/chat/completions", self.config.base_url());
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {status}: {body}"));
        }

        let body: ChatResponse = response.json().await.map_err(|e| e.to_string())?;
        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| "response contained no choices".to_string())
    }
}

#[async_trait]
impl CompletionClient for ChatClient {
    async fn complete(&self, user_prompt: &str) -> Result<String> {
        if user_prompt.trim().is_empty() {
            return Err(RetrievalError::EmptyInput);
        }

        match self.call(user_prompt).await {
            Ok(answer) => Ok(answer),
            Err(detail) => {
                tracing::error!("LLM call failed: {detail}");
                Ok(format!(
                    "LLM call failed for model '{}': {detail}",
                    self.config.model
                ))
            }
        }
    }
}
