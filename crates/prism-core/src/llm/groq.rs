//! Groq chat provider (OpenAI-compatible API).
//!
//! Groq serves the Chat Completions format, so this delegates to
//! `OpenAiProvider` with Groq's base URL.

use super::openai::OpenAiProvider;
use super::provider::{ChatProvider, ChatRequest, ChatResponse};
use crate::error::ProviderError;
use async_trait::async_trait;

/// Groq provider wrapping an OpenAI-compatible endpoint.
pub struct GroqProvider {
    inner: OpenAiProvider,
}

impl GroqProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            inner: OpenAiProvider::new("groq", endpoint, api_key, model),
        }
    }
}

#[async_trait]
impl ChatProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        tracing::debug!("Groq chat completion with model {}", self.inner.model());
        self.inner.complete(request).await
    }
}
