//! Shared helper for timeout-wrapped generative calls.

use hogarth_core::{GenerateRequest, Message};
use hogarth_error::{GenerationError, GenerationErrorKind, HogarthResult};
use hogarth_interface::Driver;
use std::sync::Arc;
use std::time::Duration;

use crate::WorkflowSettings;

/// Build the request for one pipeline step from an assembled prompt.
pub(crate) fn step_request(prompt: String, settings: &WorkflowSettings) -> GenerateRequest {
    GenerateRequest {
        messages: vec![Message::user(prompt)],
        max_tokens: Some(*settings.max_tokens()),
        temperature: Some(*settings.temperature()),
        model: settings.model().clone(),
    }
}

/// Call the driver with the configured per-step deadline.
///
/// A timeout is indistinguishable from any other provider failure as far as
/// the engine is concerned: the step fails, the run terminates.
///
/// # Errors
///
/// Propagates driver errors; maps an elapsed deadline to a timeout-kind
/// [`GenerationError`] and a blank reply to the empty-response kind.
pub(crate) async fn call_driver(
    driver: &Arc<dyn Driver>,
    req: &GenerateRequest,
    deadline: Duration,
) -> HogarthResult<String> {
    match tokio::time::timeout(deadline, driver.generate(req)).await {
        Ok(Ok(response)) => {
            if response.text.trim().is_empty() {
                Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into())
            } else {
                Ok(response.text)
            }
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(GenerationError::new(GenerationErrorKind::Timeout(deadline.as_secs())).into()),
    }
}
