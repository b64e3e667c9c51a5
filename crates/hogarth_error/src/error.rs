//! Top-level error wrapper types.

use crate::{
    ConfigError, EvaluationError, GenerationError, HttpError, JsonError, ScriptError,
    WorkflowError,
};

/// The foundation error enum for the Hogarth workspace.
///
/// # Examples
///
/// ```
/// use hogarth_error::{HogarthError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: HogarthError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HogarthErrorKind {
    /// Generative capability failure
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Evaluation failure
    #[from(EvaluationError)]
    Evaluation(EvaluationError),
    /// Structured script failure
    #[from(ScriptError)]
    Script(ScriptError),
    /// Workflow orchestration failure
    #[from(WorkflowError)]
    Workflow(WorkflowError),
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Hogarth error with kind discrimination.
///
/// # Examples
///
/// ```
/// use hogarth_error::{HogarthResult, ConfigError};
///
/// fn might_fail() -> HogarthResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Hogarth Error: {}", _0)]
pub struct HogarthError(Box<HogarthErrorKind>);

impl HogarthError {
    /// Create a new error from a kind.
    pub fn new(kind: HogarthErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HogarthErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to HogarthErrorKind
impl<T> From<T> for HogarthError
where
    T: Into<HogarthErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Hogarth operations.
///
/// # Examples
///
/// ```
/// use hogarth_error::{HogarthResult, HttpError};
///
/// fn fetch_data() -> HogarthResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type HogarthResult<T> = std::result::Result<T, HogarthError>;
