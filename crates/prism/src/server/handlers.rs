//! Route handlers for the web frontend.

use super::{error::ApiError, AppState};
use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Form fields shared by `/refine_prompt` and `/generate`.
///
/// An empty field counts as absent: `prompt=` is rejected, `n=` means 1.
#[derive(Debug, Deserialize)]
pub struct PromptForm {
    #[serde(deserialize_with = "non_empty")]
    pub prompt: String,
    #[serde(default = "default_count", deserialize_with = "count_or_default")]
    pub n: u32,
}

fn default_count() -> u32 {
    1
}

fn non_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = String::deserialize(deserializer)?;
    if value.is_empty() {
        return Err(de::Error::custom("field `prompt` must not be empty"));
    }
    Ok(value)
}

fn count_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    if raw.is_empty() {
        return Ok(default_count());
    }
    raw.parse().map_err(de::Error::custom)
}

#[derive(Debug, Deserialize)]
pub struct ProxyParams {
    pub url: String,
}

/// Body of a successful `/refine_prompt` call.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefineResponse {
    pub refined_prompts: Vec<String>,
}

/// Body of a successful `/generate` call.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub image_urls: Vec<String>,
}

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// POST /refine_prompt
///
/// Always answers with exactly `n` prompts; units whose provider call failed
/// carry the original prompt.
pub async fn refine_prompt(
    State(state): State<AppState>,
    Form(form): Form<PromptForm>,
) -> Result<Json<RefineResponse>, ApiError> {
    tracing::debug!("Refine request: n={}", form.n);
    let refined_prompts = state
        .refiner
        .refine_batch(&form.prompt, form.n as usize)
        .await?;
    Ok(Json(RefineResponse { refined_prompts }))
}

/// POST /generate
pub async fn generate(
    State(state): State<AppState>,
    Form(form): Form<PromptForm>,
) -> Result<Json<GenerateResponse>, ApiError> {
    tracing::debug!("Generate request: n={}", form.n);
    let image_urls = state.generator.generate(&form.prompt, form.n).await?;
    Ok(Json(GenerateResponse { image_urls }))
}

/// GET /proxy_image?url=...
///
/// Streams the upstream body through unchanged.
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(params): Query<ProxyParams>,
) -> Result<Response, ApiError> {
    let image = state.proxy.fetch(&params.url).await?;

    let mut headers = HeaderMap::new();
    if let Some(value) = image
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Some(len) = image.content_length() {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    Ok((headers, Body::from_stream(image.into_stream())).into_response())
}
