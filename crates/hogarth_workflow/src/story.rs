//! Prose story pipeline: writer, LLM-backed evaluator, rewriter.

use crate::engine::RevisionSteps;
use crate::generate::{call_driver, step_request};
use crate::{WorkflowSettings, prompts};
use async_trait::async_trait;
use hogarth_core::{Evaluation, SourcePost, Story, StoryMood};
use hogarth_error::{EvaluationError, EvaluationErrorKind, HogarthResult};
use hogarth_interface::Driver;
use std::sync::Arc;

/// Submission payload for a story run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoryInput {
    /// Seed post to transform
    pub post: SourcePost,
    /// Narrative mood selection
    pub mood: StoryMood,
}

/// Step set for the prose pipeline.
///
/// All three steps are generative; the evaluator's reply is parsed from the
/// line format the rubric prompt pins down.
pub struct StorySteps {
    driver: Arc<dyn Driver>,
    settings: WorkflowSettings,
}

impl StorySteps {
    /// Create the story step set.
    pub fn new(driver: Arc<dyn Driver>, settings: WorkflowSettings) -> Self {
        Self { driver, settings }
    }
}

#[async_trait]
impl RevisionSteps for StorySteps {
    type Input = StoryInput;
    type Artifact = Story;

    #[tracing::instrument(skip(self, input), fields(post_id = %input.post.id, mood = %input.mood))]
    async fn write(&self, input: &Self::Input) -> HogarthResult<Story> {
        let prompt = prompts::story_writer_prompt(&input.post, input.mood);
        let text = call_driver(
            &self.driver,
            &step_request(prompt, &self.settings),
            self.settings.step_timeout(),
        )
        .await?;
        tracing::info!(chars = text.len(), "Story draft written");
        Ok(Story::draft(text))
    }

    #[tracing::instrument(skip(self, artifact))]
    async fn evaluate(&self, artifact: &Story) -> HogarthResult<Evaluation> {
        let prompt = prompts::story_evaluator_prompt(&artifact.content);
        let reply = call_driver(
            &self.driver,
            &step_request(prompt, &self.settings),
            self.settings.step_timeout(),
        )
        .await
        .map_err(|e| {
            EvaluationError::new(EvaluationErrorKind::Generation(e.to_string()))
        })?;
        let evaluation = parse_story_evaluation(&reply)?;
        Ok(evaluation)
    }

    #[tracing::instrument(skip(self, _input, artifact, evaluation), fields(revision = artifact.revision))]
    async fn rewrite(
        &self,
        _input: &Self::Input,
        artifact: &Story,
        evaluation: &Evaluation,
    ) -> HogarthResult<Story> {
        let prompt = prompts::story_rewriter_prompt(&artifact.content, &evaluation.feedback);
        let text = call_driver(
            &self.driver,
            &step_request(prompt, &self.settings),
            self.settings.step_timeout(),
        )
        .await?;
        tracing::info!(chars = text.len(), "Story rewritten");
        Ok(artifact.revised(text))
    }
}

/// Parse the evaluator's line-format reply.
///
/// The `Score:` line is mandatory: a reply without a parseable score is an
/// [`EvaluationError`], deliberately not repaired, because a guessed score
/// would silently bias the revision decision. Subscore lines and feedback
/// degrade to benign defaults when absent.
///
/// # Errors
///
/// Returns a parse-kind [`EvaluationError`] when no parseable `Score:` line
/// is present.
///
/// # Examples
///
/// ```
/// use hogarth_workflow::parse_story_evaluation;
///
/// let reply = "Score: 8.5\nCoherence: 9\nEngagement: 8\nLength Appropriate: yes\nFeedback: Tighten the middle.";
/// let eval = parse_story_evaluation(reply).unwrap();
/// assert_eq!(eval.score, 8.5);
/// assert_eq!(eval.feedback, "Tighten the middle.");
/// ```
pub fn parse_story_evaluation(reply: &str) -> Result<Evaluation, EvaluationError> {
    let mut score: Option<f32> = None;
    let mut coherence: Option<f32> = None;
    let mut engagement: Option<f32> = None;
    let mut length_ok = true;
    let mut feedback: Option<String> = None;

    for line in reply.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Score:") {
            score = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("Coherence:") {
            coherence = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("Engagement:") {
            engagement = rest.trim().parse().ok();
        } else if let Some(rest) = line.strip_prefix("Length Appropriate:") {
            length_ok = rest.trim().to_lowercase().contains("yes");
        } else if let Some(rest) = line.strip_prefix("Feedback:") {
            feedback = Some(rest.trim().to_string());
        }
    }

    let score = score.ok_or_else(|| {
        EvaluationError::new(EvaluationErrorKind::Parse(format!(
            "no parseable Score line in reply ({} chars)",
            reply.len()
        )))
    })?;

    let mut evaluation = Evaluation::new(
        score,
        feedback.unwrap_or_else(|| "Story evaluation completed.".to_string()),
    );
    if let Some(coherence) = coherence {
        evaluation
            .subscores
            .insert("coherence".to_string(), coherence.clamp(0.0, 10.0));
    }
    if let Some(engagement) = engagement {
        evaluation
            .subscores
            .insert("engagement".to_string(), engagement.clamp(0.0, 10.0));
    }
    if !length_ok {
        evaluation
            .issues
            .push("Length flagged as inappropriate".to_string());
    }

    Ok(evaluation)
}
