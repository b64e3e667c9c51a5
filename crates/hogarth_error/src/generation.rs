//! Generative-capability error types.

/// Specific failure conditions for calls into the generative capability.
///
/// These are infrastructure-class failures: the provider call itself broke.
/// They are never retried within a workflow step; the run terminates in its
/// failed phase and the caller may submit a fresh run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key not found in environment or configuration
    #[display("GEMINI_API_KEY not set in environment or configuration")]
    MissingApiKey,
    /// Provider rejected the credentials
    #[display("Provider authentication failed: {}", _0)]
    Auth(String),
    /// Provider rate limit hit
    #[display("Provider rate limit exceeded: {}", _0)]
    RateLimit(String),
    /// Generative call exceeded the configured deadline
    #[display("Generative call timed out after {}s", _0)]
    Timeout(u64),
    /// Provider-side request failure (network, 5xx, malformed transport)
    #[display("Provider request failed: {}", _0)]
    Provider(String),
    /// HTTP error with status code and message
    #[display("HTTP {} from provider: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Provider returned a response with no usable text
    #[display("Provider returned an empty response")]
    EmptyResponse,
}

/// Error type for generative-capability failures.
///
/// # Examples
///
/// ```
/// use hogarth_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Timeout(30));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
