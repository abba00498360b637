//! Provider integration for prompt refinement and image generation.
//!
//! Provides capability traits over OpenAI-compatible backends (Groq for chat,
//! Together for images), the concurrent refinement engine, and the image
//! generation front.

pub(crate) mod generator;
pub(crate) mod groq;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod refiner;
pub(crate) mod together;

pub use generator::ImageGenerator;
pub use groq::GroqProvider;
pub use openai::OpenAiProvider;
pub use provider::{
    resolve_env_var, ChatMessage, ChatProvider, ChatRequest, ChatResponse, GeneratedImage,
    ImageProvider, ImageRequest, ImageResponse, ProviderFactory, Role, REFINE_SYSTEM_PROMPT,
};
pub use refiner::{strip_refined_tags, RefineOutcome, Refiner};
pub use together::TogetherProvider;
