//! Prism Core - prompt refinement, image generation and image relay.
//!
//! Prism forwards user text to two AI providers: a chat model that expands a
//! short prompt into a detailed image description, and an image model that
//! turns a prompt into image URLs. A small relay fetches generated images on
//! behalf of the browser.
//!
//! # Architecture
//!
//! ```text
//! prompt ─► Refiner (N concurrent chat calls) ─► refined prompts
//! prompt ─► ImageGenerator (one image call)   ─► image URLs
//! url    ─► ImageProxy (GET, streamed)        ─► bytes + content-type
//! ```
//!
//! Providers sit behind the [`ChatProvider`] and [`ImageProvider`] traits so
//! callers can substitute fakes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism_core::{Config, ProviderFactory, Refiner};
//!
//! #[tokio::main]
//! async fn main() -> prism_core::Result<()> {
//!     let config = Config::load()?;
//!     let refiner = Refiner::new(ProviderFactory::chat(&config.providers)?);
//!
//!     let prompts = refiner.refine_batch("a cat", 2).await?;
//!     println!("{prompts:?}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod proxy;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PrismError, ProviderError, ProxyError, RefineError, Result};
pub use llm::{
    ChatProvider, ChatRequest, ChatResponse, GeneratedImage, ImageGenerator, ImageProvider,
    ImageRequest, ImageResponse, ProviderFactory, RefineOutcome, Refiner,
};
pub use proxy::{ImageProxy, ProxiedImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
