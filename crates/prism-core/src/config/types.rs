//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP frontend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Directory served under `/static`
    pub static_dir: PathBuf,

    /// HTML file served at `/` instead of the built-in page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
            index_file: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Provider configurations, one per capability.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Text generation provider used for prompt refinement
    pub groq: GroqConfig,

    /// Image generation provider
    pub together: TogetherConfig,
}

/// Groq configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroqConfig {
    /// OpenAI-compatible API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Chat model used for refinement
    pub model: String,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1".to_string(),
            api_key: "${GROQ_API_KEY}".to_string(),
            model: "llama3-8b-8192".to_string(),
        }
    }
}

/// Together configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TogetherConfig {
    /// OpenAI-compatible API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Image model
    pub model: String,
}

impl Default for TogetherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.together.xyz/v1".to_string(),
            api_key: "${TOGETHER_API_KEY}".to_string(),
            model: "black-forest-labs/FLUX.1-schnell".to_string(),
        }
    }
}
