//! Together image provider (OpenAI-compatible Images API).

use super::openai::OpenAiProvider;
use super::provider::{ImageProvider, ImageRequest, ImageResponse};
use crate::error::ProviderError;
use async_trait::async_trait;

/// Together provider wrapping an OpenAI-compatible endpoint.
pub struct TogetherProvider {
    inner: OpenAiProvider,
}

impl TogetherProvider {
    pub fn new(endpoint: &str, api_key: &str, model: &str) -> Self {
        Self {
            inner: OpenAiProvider::new("together", endpoint, api_key, model),
        }
    }
}

#[async_trait]
impl ImageProvider for TogetherProvider {
    fn name(&self) -> &str {
        "together"
    }

    async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError> {
        tracing::debug!(
            "Together image generation with model {} (n={})",
            self.inner.model(),
            request.n
        );
        self.inner.generate(request).await
    }
}
