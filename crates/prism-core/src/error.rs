//! Error types for Prism.
//!
//! Errors are grouped by the component that raises them so the HTTP frontend
//! can map each family to the right status code without inspecting messages.

use thiserror::Error;

/// Top-level error type for Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Text or image provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Image proxy errors
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Refinement orchestration errors
    #[error("Refinement error: {0}")]
    Refine(#[from] RefineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by the text and image provider clients.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider call failed (transport, HTTP status, or malformed body)
    #[error("{provider}: {message}")]
    Api {
        provider: String,
        message: String,
        /// HTTP status code, when the failure came from a response
        status_code: Option<u16>,
    },

    /// No API key could be resolved for the provider
    #[error("{provider} API key not set. Set the {var} env var.")]
    MissingApiKey { provider: String, var: String },
}

impl ProviderError {
    pub(crate) fn api(provider: &str, message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Api {
            provider: provider.to_string(),
            message: message.into(),
            status_code,
        }
    }

    /// HTTP status reported by the provider, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            Self::MissingApiKey { .. } => None,
        }
    }
}

/// Errors raised while relaying an external image.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The upstream fetch failed or answered with a non-success status.
    /// `message` carries the whole cause chain, e.g. "... : Connection refused".
    #[error("Error fetching image: {message}")]
    Upstream {
        message: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<reqwest::Error> for ProxyError {
    fn from(source: reqwest::Error) -> Self {
        Self::Upstream {
            message: error_chain(&source),
            source,
        }
    }
}

/// Join an error and its `source()` chain with ": ", skipping causes whose
/// text is already part of the message.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = e.source();
    }
    message
}

/// Errors from the refinement fan-out itself (never from a single unit).
#[derive(Error, Debug)]
pub enum RefineError {
    /// A refinement task panicked or was cancelled before completing
    #[error("Refinement task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;
