//! Mapping of service failures onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use prism_core::{ProviderError, ProxyError, RefineError};
use serde_json::json;

/// A failed request, rendered as a JSON envelope.
#[derive(Debug)]
pub enum ApiError {
    /// The refinement fan-out itself broke (500)
    Refine(RefineError),
    /// The image provider call failed (500)
    Generate(ProviderError),
    /// The proxied upstream failed or was unreachable (400)
    Proxy(ProxyError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Refine(_) | Self::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Proxy(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<RefineError> for ApiError {
    fn from(e: RefineError) -> Self {
        Self::Refine(e)
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        Self::Generate(e)
    }
}

impl From<ProxyError> for ApiError {
    fn from(e: ProxyError) -> Self {
        Self::Proxy(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Provider details stay in the log; only the proxy echoes its cause.
        let body = match &self {
            Self::Refine(e) => {
                tracing::error!("Error refining prompts: {e}");
                json!({ "error": "Failed to refine prompts" })
            }
            Self::Generate(e) => {
                tracing::error!("Error generating image: {e}");
                json!({ "error": "Failed to generate image" })
            }
            Self::Proxy(e) => {
                tracing::warn!("{e}");
                json!({ "detail": e.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
