//! Run identity, phase state machine, and status snapshots.

use chrono::{DateTime, Utc};
use hogarth_core::Evaluation;
use hogarth_error::{HogarthError, HogarthErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one workflow run.
///
/// # Examples
///
/// ```
/// use hogarth_workflow::RunId;
/// use std::str::FromStr;
///
/// let id = RunId::generate();
/// let round_trip = RunId::from_str(&id.to_string()).unwrap();
/// assert_eq!(id, round_trip);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub struct RunId(Uuid);

impl RunId {
    /// Generate a fresh random run id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Which pipeline a run belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Prose story generation
    Story,
    /// Structured webtoon script generation
    Script,
}

/// The observable phase of a run.
///
/// Transitions are monotonic except `Evaluating`, which is re-entered
/// exactly once per rewrite.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Run created, not yet started
    Pending,
    /// Writer step in flight
    Writing,
    /// Evaluator step in flight
    Evaluating,
    /// Rewriter step in flight
    Rewriting,
    /// Terminal success; the result is final
    Done,
    /// Terminal infrastructure failure
    Failed,
}

impl Phase {
    /// Whether this phase ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Failed)
    }
}

/// Structured error info attached to a failed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Error category derived from the error taxonomy
    pub category: String,
    /// Human-readable message
    pub message: String,
}

impl From<&HogarthError> for FailureInfo {
    fn from(err: &HogarthError) -> Self {
        let category = match err.kind() {
            HogarthErrorKind::Generation(_) => "generation",
            HogarthErrorKind::Evaluation(_) => "evaluation",
            HogarthErrorKind::Script(_) => "script",
            HogarthErrorKind::Workflow(_) => "workflow",
            HogarthErrorKind::Http(_) => "http",
            HogarthErrorKind::Json(_) => "json",
            HogarthErrorKind::Config(_) => "config",
        };
        Self {
            category: category.to_string(),
            message: err.to_string(),
        }
    }
}

/// Engine-internal run state: a tagged union carrying exactly the data
/// valid in each phase.
///
/// `Rewriting` always has an artifact and the evaluation that triggered it;
/// `Writing` has neither. Illegal combinations ("rewriting with no
/// feedback") are unrepresentable.
#[derive(Debug, Clone)]
pub enum RunState<A> {
    /// Run created, not yet started
    Pending,
    /// Writer step in flight
    Writing,
    /// Evaluator step in flight for the current artifact
    Evaluating {
        /// Artifact under evaluation
        artifact: A,
        /// Rewrites performed so far
        attempts: u32,
    },
    /// Rewriter step in flight
    Rewriting {
        /// Artifact being rewritten
        artifact: A,
        /// Evaluation that fell below threshold
        evaluation: Evaluation,
        /// Rewrites performed before this one
        attempts: u32,
    },
    /// Terminal success
    Done {
        /// Accepted artifact (possibly sub-threshold after exhaustion)
        artifact: A,
        /// Final evaluation
        evaluation: Evaluation,
        /// Total rewrites performed
        attempts: u32,
    },
    /// Terminal failure
    Failed {
        /// What went wrong
        error: FailureInfo,
        /// Last good artifact, when one existed before the failure
        artifact: Option<A>,
        /// Last completed evaluation, if any
        evaluation: Option<Evaluation>,
        /// Rewrites performed before the failure
        attempts: u32,
    },
}

impl<A> RunState<A> {
    /// The observable phase of this state.
    pub fn phase(&self) -> Phase {
        match self {
            RunState::Pending => Phase::Pending,
            RunState::Writing => Phase::Writing,
            RunState::Evaluating { .. } => Phase::Evaluating,
            RunState::Rewriting { .. } => Phase::Rewriting,
            RunState::Done { .. } => Phase::Done,
            RunState::Failed { .. } => Phase::Failed,
        }
    }

    /// Rewrites performed so far.
    pub fn attempts(&self) -> u32 {
        match self {
            RunState::Pending | RunState::Writing => 0,
            RunState::Evaluating { attempts, .. }
            | RunState::Rewriting { attempts, .. }
            | RunState::Done { attempts, .. }
            | RunState::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Serializable status record published to the run registry.
///
/// Each transition replaces the whole snapshot, so a concurrent reader
/// always sees phase, attempts, score, result and error from the same
/// transition, never a torn mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Run identity
    pub run_id: RunId,
    /// Owning pipeline
    pub kind: WorkflowKind,
    /// Current phase
    pub phase: Phase,
    /// Submission payload, recorded once at creation
    #[serde(default)]
    pub input: Option<serde_json::Value>,
    /// Rewrites performed so far
    pub attempts: u32,
    /// Most recent evaluation score, once one exists
    pub score: Option<f32>,
    /// Final artifact on `Done`; best-effort artifact on `Failed` when one
    /// was preserved
    pub result: Option<serde_json::Value>,
    /// Failure info, present only on `Failed`
    pub error: Option<FailureInfo>,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Time of the last published transition
    pub updated_at: DateTime<Utc>,
}

impl RunSnapshot {
    /// Initial snapshot for a freshly submitted run.
    pub fn pending(run_id: RunId, kind: WorkflowKind) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            kind,
            phase: Phase::Pending,
            input: None,
            attempts: 0,
            score: None,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach the submission payload to this snapshot.
    pub fn with_input<I: Serialize>(mut self, input: &I) -> Self {
        self.input = to_result_value(input);
        self
    }

    /// Project an engine state into the next snapshot.
    ///
    /// Carries the previous score forward through non-scoring phases so a
    /// poller watching a rewrite still sees the score that triggered it.
    pub fn advanced<A: Serialize>(&self, state: &RunState<A>) -> Self {
        let mut next = self.clone();
        next.phase = state.phase();
        next.attempts = state.attempts();
        next.updated_at = Utc::now();

        match state {
            RunState::Pending | RunState::Writing | RunState::Evaluating { .. } => {}
            RunState::Rewriting { evaluation, .. } => {
                next.score = Some(evaluation.score);
            }
            RunState::Done {
                artifact,
                evaluation,
                ..
            } => {
                next.score = Some(evaluation.score);
                next.result = to_result_value(artifact);
            }
            RunState::Failed {
                error,
                artifact,
                evaluation,
                ..
            } => {
                next.error = Some(error.clone());
                if let Some(evaluation) = evaluation {
                    next.score = Some(evaluation.score);
                }
                next.result = artifact.as_ref().and_then(to_result_value);
            }
        }

        next
    }
}

fn to_result_value<A: Serialize>(artifact: &A) -> Option<serde_json::Value> {
    match serde_json::to_value(artifact) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to serialize run result for snapshot");
            None
        }
    }
}
