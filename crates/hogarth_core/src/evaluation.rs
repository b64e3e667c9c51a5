//! Evaluation results produced by artifact evaluators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score and feedback for a candidate artifact.
///
/// The score is the workflow engine's sole transition signal; feedback and
/// issues are threaded into the rewriter prompt. Scores are bounded to
/// `[0, 10]` at every producer.
///
/// # Examples
///
/// ```
/// use hogarth_core::Evaluation;
///
/// let eval = Evaluation::new(8.5, "Tight pacing, strong hook.");
/// assert!(eval.score >= 8.0);
/// assert!(eval.issues.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Overall quality score in `[0, 10]`
    pub score: f32,
    /// Feedback directed at the rewriter
    pub feedback: String,
    /// Specific issues found (empty for prose evaluations)
    #[serde(default)]
    pub issues: Vec<String>,
    /// Per-criterion subscores, when the evaluator produces them
    #[serde(default)]
    pub subscores: BTreeMap<String, f32>,
}

impl Evaluation {
    /// Create an evaluation with a clamped score and no issues or subscores.
    pub fn new(score: f32, feedback: impl Into<String>) -> Self {
        Self {
            score: score.clamp(0.0, 10.0),
            feedback: feedback.into(),
            issues: Vec::new(),
            subscores: BTreeMap::new(),
        }
    }

    /// Attach issues found during evaluation.
    pub fn with_issues(mut self, issues: Vec<String>) -> Self {
        self.issues = issues;
        self
    }

    /// Attach per-criterion subscores.
    pub fn with_subscores(mut self, subscores: BTreeMap<String, f32>) -> Self {
        self.subscores = subscores;
        self
    }
}
