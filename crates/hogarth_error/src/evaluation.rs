//! Evaluator error types.

/// Specific error conditions for artifact evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum EvaluationErrorKind {
    /// Evaluator reply could not be parsed into score + feedback.
    ///
    /// Deliberately not schema-repaired: a guessed score would corrupt the
    /// revision decision itself.
    #[display("Failed to parse evaluation reply: {}", _0)]
    Parse(String),
    /// The underlying generative call failed
    #[display("Evaluation call failed: {}", _0)]
    Generation(String),
}

/// Error type for evaluation failures.
///
/// A malformed evaluation is a hard failure of the evaluating step; it
/// propagates to the run's terminal phase rather than being absorbed.
///
/// # Examples
///
/// ```
/// use hogarth_error::{EvaluationError, EvaluationErrorKind};
///
/// let err = EvaluationError::new(EvaluationErrorKind::Parse("no Score line".into()));
/// assert!(format!("{}", err).contains("Score"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Evaluation Error: {} at line {} in {}", kind, line, file)]
pub struct EvaluationError {
    /// The specific error condition
    pub kind: EvaluationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl EvaluationError {
    /// Create a new EvaluationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: EvaluationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
