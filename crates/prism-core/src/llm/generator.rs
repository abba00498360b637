//! Image generation front for the configured image provider.

use super::provider::{ImageProvider, ImageRequest};
use crate::error::ProviderError;

/// Turns a prompt into image URLs with a single provider call.
pub struct ImageGenerator {
    provider: Box<dyn ImageProvider>,
}

impl ImageGenerator {
    pub fn new(provider: Box<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Generate `n` images for `prompt` and return their URLs in provider order.
    ///
    /// Provider failures are returned unlogged; callers decide how to report them.
    ///
    /// The provider may return fewer (or more) images than requested; the
    /// list is passed through as-is.
    pub async fn generate(&self, prompt: &str, n: u32) -> Result<Vec<String>, ProviderError> {
        let request = ImageRequest {
            prompt: prompt.to_string(),
            n,
        };

        let response = self.provider.generate(&request).await?;

        if response.images.len() != n as usize {
            tracing::debug!(
                "{} returned {} images for n={}",
                self.provider.name(),
                response.images.len(),
                n
            );
        }

        Ok(response.images.into_iter().map(|image| image.url).collect())
    }
}
