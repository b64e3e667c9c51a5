//! The bounded revision engine.
//!
//! Drives any "produce → judge → optionally improve" task through the
//! write / evaluate / rewrite step set. The engine is agnostic to artifact
//! shape; only the [`RevisionSteps`] implementation differs between the
//! prose and script pipelines.
//!
//! The revision loop is bounded by an explicit attempt counter checked
//! *before* the backward transition into rewriting. Evaluator scores come
//! from a generative judge and cannot be trusted to converge, so the
//! counter, not graph topology, is what guarantees termination.

use crate::{FailureInfo, RevisionPolicy, RunId, RunRegistry, RunSnapshot, RunState, WorkflowKind};
use async_trait::async_trait;
use hogarth_core::Evaluation;
use hogarth_error::HogarthResult;
use serde::Serialize;

/// The three steps of one revision pipeline.
///
/// Implementations call into the generative capability (or run
/// deterministic checks) and may fail for infrastructure reasons; the
/// engine turns any step failure into the run's terminal failed phase.
#[async_trait]
pub trait RevisionSteps: Send + Sync {
    /// Submission payload for this pipeline.
    type Input: Send + Sync;
    /// The artifact produced and revised by this pipeline.
    type Artifact: Clone + Serialize + Send + Sync;

    /// Produce the initial artifact from the input.
    async fn write(&self, input: &Self::Input) -> HogarthResult<Self::Artifact>;

    /// Score the current artifact.
    async fn evaluate(&self, artifact: &Self::Artifact) -> HogarthResult<Evaluation>;

    /// Improve the artifact using the evaluator's feedback.
    ///
    /// The original input is available for reference; the script rewriter,
    /// for instance, shows the source story alongside the feedback.
    async fn rewrite(
        &self,
        input: &Self::Input,
        artifact: &Self::Artifact,
        evaluation: &Evaluation,
    ) -> HogarthResult<Self::Artifact>;
}

/// Final result of a completed run.
#[derive(Debug, Clone)]
pub struct RevisionOutcome<A> {
    /// The accepted artifact (possibly sub-threshold after exhaustion)
    pub artifact: A,
    /// The evaluation that accompanied acceptance
    pub evaluation: Evaluation,
    /// Rewrites performed
    pub attempts: u32,
}

/// Publishes a run's state transitions to the registry.
///
/// Each transition becomes a whole-snapshot replacement, so pollers see
/// phase, attempts, score and result move together.
pub struct RunHandle {
    registry: RunRegistry,
    last: RunSnapshot,
}

impl RunHandle {
    /// Register a pending run and return its handle.
    pub async fn create(registry: RunRegistry, run_id: RunId, kind: WorkflowKind) -> Self {
        let snapshot = RunSnapshot::pending(run_id, kind);
        registry.create(snapshot.clone()).await;
        Self {
            registry,
            last: snapshot,
        }
    }

    /// Register a pending run carrying its submission payload.
    pub async fn create_with_input<I: Serialize>(
        registry: RunRegistry,
        run_id: RunId,
        kind: WorkflowKind,
        input: &I,
    ) -> Self {
        let snapshot = RunSnapshot::pending(run_id, kind).with_input(input);
        registry.create(snapshot.clone()).await;
        Self {
            registry,
            last: snapshot,
        }
    }

    /// The id of the run this handle publishes for.
    pub fn run_id(&self) -> RunId {
        self.last.run_id
    }

    async fn publish<A: Serialize>(&mut self, state: &RunState<A>) {
        self.last = self.last.advanced(state);
        self.registry.publish(self.last.clone()).await;
    }
}

/// Drives one pipeline's steps through the bounded revision state machine.
///
/// ```text
/// PENDING → WRITING → EVALUATING → (REWRITING → EVALUATING)? → DONE | FAILED
/// ```
///
/// Guarantees, regardless of evaluator behavior:
/// - at most `1 + (max_attempts + 1) + max_attempts` step calls per run;
/// - a sub-threshold score after exhausting the attempt budget is
///   *accepted*: the run ends `Done` with its best effort, never `Failed`;
/// - a step failure ends the run `Failed`, preserving the last good
///   artifact when one exists.
pub struct RevisionEngine<S: RevisionSteps> {
    steps: S,
    policy: RevisionPolicy,
}

impl<S: RevisionSteps> RevisionEngine<S> {
    /// Create an engine from a step set and its transition policy.
    pub fn new(steps: S, policy: RevisionPolicy) -> Self {
        Self { steps, policy }
    }

    /// Access the underlying step set.
    pub fn steps(&self) -> &S {
        &self.steps
    }

    /// Execute one run to a terminal phase, publishing every transition.
    ///
    /// # Errors
    ///
    /// Returns the step error that terminated the run; the failed snapshot
    /// has already been published when this returns `Err`.
    #[tracing::instrument(skip(self, input, handle), fields(run_id = %handle.run_id()))]
    pub async fn run(
        &self,
        input: &S::Input,
        handle: &mut RunHandle,
    ) -> HogarthResult<RevisionOutcome<S::Artifact>> {
        let threshold = *self.policy.threshold();
        let max_attempts = *self.policy.max_attempts();
        tracing::debug!(threshold, max_attempts, "Starting revision run");

        handle.publish(&RunState::<S::Artifact>::Writing).await;
        let mut artifact = match self.steps.write(input).await {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, "Writer step failed");
                handle
                    .publish(&RunState::<S::Artifact>::Failed {
                        error: FailureInfo::from(&e),
                        artifact: None,
                        evaluation: None,
                        attempts: 0,
                    })
                    .await;
                return Err(e);
            }
        };

        let mut attempts = 0u32;
        let mut last_evaluation: Option<Evaluation> = None;

        loop {
            handle
                .publish(&RunState::Evaluating {
                    artifact: artifact.clone(),
                    attempts,
                })
                .await;

            let evaluation = match self.steps.evaluate(&artifact).await {
                Ok(evaluation) => evaluation,
                Err(e) => {
                    tracing::error!(error = %e, attempts, "Evaluator step failed");
                    handle
                        .publish(&RunState::Failed {
                            error: FailureInfo::from(&e),
                            artifact: Some(artifact),
                            evaluation: last_evaluation,
                            attempts,
                        })
                        .await;
                    return Err(e);
                }
            };

            tracing::info!(score = evaluation.score, attempts, "Evaluation complete");

            // The counter is checked here, before any backward transition,
            // so the loop is provably bounded whatever the scores do.
            if evaluation.score >= threshold || attempts >= max_attempts {
                if evaluation.score < threshold {
                    tracing::warn!(
                        score = evaluation.score,
                        attempts,
                        "Attempt budget exhausted; accepting best effort"
                    );
                }
                handle
                    .publish(&RunState::Done {
                        artifact: artifact.clone(),
                        evaluation: evaluation.clone(),
                        attempts,
                    })
                    .await;
                return Ok(RevisionOutcome {
                    artifact,
                    evaluation,
                    attempts,
                });
            }

            handle
                .publish(&RunState::Rewriting {
                    artifact: artifact.clone(),
                    evaluation: evaluation.clone(),
                    attempts,
                })
                .await;

            match self.steps.rewrite(input, &artifact, &evaluation).await {
                Ok(rewritten) => {
                    attempts += 1;
                    artifact = rewritten;
                    last_evaluation = Some(evaluation);
                }
                Err(e) => {
                    tracing::error!(error = %e, attempts, "Rewriter step failed");
                    // Keep the pre-rewrite artifact as the best-effort result.
                    handle
                        .publish(&RunState::Failed {
                            error: FailureInfo::from(&e),
                            artifact: Some(artifact),
                            evaluation: Some(evaluation),
                            attempts,
                        })
                        .await;
                    return Err(e);
                }
            }
        }
    }
}
