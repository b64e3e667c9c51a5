//! Trait definitions for LLM backends.

use async_trait::async_trait;
use hogarth_core::{GenerateRequest, GenerateResponse};
use hogarth_error::HogarthResult;

/// Core trait that all LLM backends must implement.
///
/// This is the minimal interface for text generation. Structured generation
/// is the same call: the schema hint travels inside the prompt and the
/// workflow's extraction + repair layers take it from there.
///
/// Implementations are expected to be non-deterministic and to fail for
/// infrastructure reasons (network, auth, rate limits); callers wrap every
/// invocation in a timeout and treat any failure as terminal for the
/// current workflow step.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Generate model output for a request.
    async fn generate(&self, req: &GenerateRequest) -> HogarthResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.0-flash-exp").
    fn model_name(&self) -> &str;
}
