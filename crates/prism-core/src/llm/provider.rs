//! Provider traits and request/response types.
//!
//! Defines the two capabilities the frontend needs ("complete a chat" and
//! "generate images"), plus the factory that builds the configured providers.

use crate::config::ProvidersConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// System instruction sent with every refinement request.
pub const REFINE_SYSTEM_PROMPT: &str = "You are an AI assistant that helps refine prompts for image generation. \
Your task is to take the user's input and create a detailed, vivid description that can be used \
to generate an interesting and visually appealing image. Focus on adding visual details, style \
suggestions, and mood elements. return only the refined prompt in between \
<refined_prompt></refined_prompt> tags.";

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Conversation sent to the model
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens to generate (provider default when unset)
    pub max_tokens: Option<u32>,
    /// Sampling temperature (provider default when unset)
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Build the refinement request for a user prompt.
    ///
    /// The model is asked to wrap its answer in `<refined_prompt>` tags.
    pub fn refine(prompt: &str) -> Self {
        Self {
            messages: vec![
                ChatMessage::system(REFINE_SYSTEM_PROMPT),
                ChatMessage::user(format!("Refine this prompt for image generation: {prompt}")),
            ],
            max_tokens: None,
            temperature: None,
        }
    }
}

/// The response from a chat completion call.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text, trimmed
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// An image generation request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    /// Number of images requested
    pub n: u32,
}

/// A single generated image, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

/// The response from an image generation call.
#[derive(Debug, Clone)]
pub struct ImageResponse {
    /// Images in provider order; the count may differ from the request
    pub images: Vec<GeneratedImage>,
    /// Model identifier used
    pub model: String,
}

/// Chat completion capability.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn ChatProvider>` for dynamic dispatch).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name for logging (e.g., "groq").
    fn name(&self) -> &str;

    /// Run a chat completion.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Image generation capability.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider name for logging (e.g., "together").
    fn name(&self) -> &str;

    /// Generate images for a prompt.
    async fn generate(&self, request: &ImageRequest) -> Result<ImageResponse, ProviderError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Name of the env var a `${ENV_VAR}` reference points at, for error messages.
fn env_var_name(value: &str, fallback: &str) -> String {
    value
        .strip_prefix("${")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(fallback)
        .to_string()
}

/// Factory that creates the configured providers.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create the chat provider used for prompt refinement.
    pub fn chat(config: &ProvidersConfig) -> Result<Box<dyn ChatProvider>, ProviderError> {
        let cfg = &config.groq;
        let api_key =
            resolve_env_var(&cfg.api_key).ok_or_else(|| ProviderError::MissingApiKey {
                provider: "Groq".to_string(),
                var: env_var_name(&cfg.api_key, "GROQ_API_KEY"),
            })?;
        Ok(Box::new(super::groq::GroqProvider::new(
            &cfg.endpoint,
            &api_key,
            &cfg.model,
        )))
    }

    /// Create the image generation provider.
    pub fn images(config: &ProvidersConfig) -> Result<Box<dyn ImageProvider>, ProviderError> {
        let cfg = &config.together;
        let api_key =
            resolve_env_var(&cfg.api_key).ok_or_else(|| ProviderError::MissingApiKey {
                provider: "Together".to_string(),
                var: env_var_name(&cfg.api_key, "TOGETHER_API_KEY"),
            })?;
        Ok(Box::new(super::together::TogetherProvider::new(
            &cfg.endpoint,
            &api_key,
            &cfg.model,
        )))
    }
}
