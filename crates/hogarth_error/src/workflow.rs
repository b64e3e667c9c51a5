//! Workflow engine error types.

/// Specific error conditions for workflow orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum WorkflowErrorKind {
    /// No run registered under the requested id
    #[display("Run '{}' not found", _0)]
    RunNotFound(String),
    /// A run's background task ended without publishing a terminal phase
    #[display("Run '{}' aborted before reaching a terminal phase", _0)]
    Aborted(String),
    /// Workflow input failed a basic precondition
    #[display("Invalid workflow input: {}", _0)]
    InvalidInput(String),
}

/// Error type for workflow orchestration.
///
/// # Examples
///
/// ```
/// use hogarth_error::{WorkflowError, WorkflowErrorKind};
///
/// let err = WorkflowError::new(WorkflowErrorKind::RunNotFound("abc".into()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Workflow Error: {} at line {} in {}", kind, line, file)]
pub struct WorkflowError {
    /// The specific error condition
    pub kind: WorkflowErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl WorkflowError {
    /// Create a new WorkflowError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: WorkflowErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
