//! Prompt refinement engine.
//!
//! Each requested refinement is an independent chat completion. Units run
//! concurrently as tokio tasks and the caller gets the whole list once every
//! unit has finished. A unit that fails falls back to the original prompt, so
//! only a broken task (panic, cancellation) can fail the batch.

use super::provider::{ChatProvider, ChatRequest};
use crate::error::RefineError;
use std::sync::Arc;

const OPEN_TAG: &str = "<refined_prompt>";
const CLOSE_TAG: &str = "</refined_prompt>";

/// Result of refining a single unit.
#[derive(Debug, Clone, PartialEq)]
pub enum RefineOutcome {
    /// The model's answer, unwrapped and trimmed
    Refined(String),
    /// The provider call failed; the original prompt is used instead
    Fallback { original: String, reason: String },
}

impl RefineOutcome {
    /// Text to hand back to the caller.
    pub fn into_text(self) -> String {
        match self {
            Self::Refined(text) => text,
            Self::Fallback { original, .. } => original,
        }
    }

    pub fn is_refined(&self) -> bool {
        matches!(self, Self::Refined(_))
    }
}

/// Trim model output and remove an exact `<refined_prompt>...</refined_prompt>`
/// wrapper. Output that is not wrapped exactly is returned trimmed but otherwise
/// unchanged.
pub fn strip_refined_tags(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix(OPEN_TAG)
        .and_then(|rest| rest.strip_suffix(CLOSE_TAG))
    {
        Some(inner) => inner.trim(),
        None => trimmed,
    }
}

/// Concurrent prompt refiner.
pub struct Refiner {
    provider: Arc<dyn ChatProvider>,
}

impl Refiner {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            provider: Arc::from(provider),
        }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Refine a single prompt, never failing.
    pub async fn refine_one(&self, prompt: &str) -> RefineOutcome {
        refine_single(self.provider.as_ref(), prompt).await
    }

    /// Refine `prompt` independently `n` times.
    pub async fn refine_batch(&self, prompt: &str, n: usize) -> Result<Vec<String>, RefineError> {
        self.refine_all(vec![prompt.to_string(); n]).await
    }

    /// Refine every prompt concurrently, returning results in input order.
    ///
    /// Spawns one tokio task per prompt and joins them in spawn order. Tasks
    /// still running when another one fails are left to finish on their own.
    pub async fn refine_all(&self, prompts: Vec<String>) -> Result<Vec<String>, RefineError> {
        let mut handles = Vec::with_capacity(prompts.len());

        for prompt in prompts {
            let provider = self.provider.clone();
            handles.push(tokio::spawn(async move {
                refine_single(provider.as_ref(), &prompt).await
            }));
        }

        let mut refined = Vec::with_capacity(handles.len());
        let mut fallbacks = 0usize;
        for handle in handles {
            let outcome = handle.await.map_err(|e| {
                tracing::error!("Refinement task panicked: {e}");
                RefineError::Task(e)
            })?;
            if !outcome.is_refined() {
                fallbacks += 1;
            }
            refined.push(outcome.into_text());
        }

        if fallbacks > 0 {
            tracing::warn!(
                "Refinement: {} of {} prompts fell back to the original",
                fallbacks,
                refined.len()
            );
        } else {
            tracing::debug!("Refinement: {} prompts refined", refined.len());
        }

        Ok(refined)
    }
}

async fn refine_single(provider: &dyn ChatProvider, prompt: &str) -> RefineOutcome {
    match provider.complete(&ChatRequest::refine(prompt)).await {
        Ok(response) => {
            tracing::debug!(
                "Refined prompt via {} in {}ms",
                response.model,
                response.latency_ms
            );
            RefineOutcome::Refined(strip_refined_tags(&response.text).to_string())
        }
        Err(e) => {
            tracing::error!("Error refining prompt: {e}");
            RefineOutcome::Fallback {
                original: prompt.to_string(),
                reason: e.to_string(),
            }
        }
    }
}
