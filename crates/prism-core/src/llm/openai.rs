//! OpenAI-compatible provider using the Chat Completions and Images APIs.
//!
//! Groq and Together both speak this wire format, so the named providers
//! delegate here with their own base URL and model.

use super::provider::{
    ChatMessage, ChatProvider, ChatRequest, ChatResponse, GeneratedImage, ImageProvider,
    ImageRequest, ImageResponse,
};
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Provider for any OpenAI-compatible API.
pub struct OpenAiProvider {
    name: String,
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a provider rooted at `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(name: &str, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            name: name.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST a JSON body and decode the JSON answer, mapping every failure mode
    /// to a `ProviderError` for this provider.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ProviderError>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::api(&self.name, format!("request failed: {e}"), None))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::api(
                &self.name,
                format!("HTTP {status}: {text}"),
                Some(status.as_u16()),
            ));
        }

        resp.json().await.map_err(|e| {
            ProviderError::api(&self.name, format!("failed to parse response: {e}"), None)
        })
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ImageBody<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct ImageGeneration {
    data: Vec<ImageData>,
    model: Option<String>,
}

#[derive(Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let start = Instant::now();

        let body = ChatBody {
            model: &self.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };
        let completion: ChatCompletion = self.post_json("/chat/completions", &body).await?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::api(&self.name, "empty choices array, no content generated", None)
            })?;

        Ok(ChatResponse {
            text: text.trim().to_string(),
            model: completion.model.unwrap_or_else(|| self.model.clone()),
            tokens_used: completion.usage.map(|u| u.total_tokens),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[async_trait]
impl ImageProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError> {
        let body = ImageBody {
            model: &self.model,
            prompt: &request.prompt,
            n: request.n,
        };
        let generation: ImageGeneration = self.post_json("/images/generations", &body).await?;

        let images = generation
            .data
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                image.url.map(|url| GeneratedImage { url }).ok_or_else(|| {
                    ProviderError::api(&self.name, format!("image {i} has no url"), None)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ImageResponse {
            images,
            model: generation.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}
