//! Structured-script error types.

/// Specific error conditions for structured script handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ScriptErrorKind {
    /// No JSON payload could be recovered from the generator's reply
    #[display("No JSON found in generator reply ({} chars)", _0)]
    NoJsonPayload(usize),
    /// Recovered payload is not valid JSON at all
    #[display("Generator reply is not parseable JSON: {}", _0)]
    JsonSyntax(String),
    /// The structured value is not the expected mapping/list tree.
    ///
    /// A true syntax/shape failure, distinct from missing-field gaps which
    /// the repair layer absorbs. Propagates.
    #[display("Malformed script structure: {}", _0)]
    MalformedStructure(String),
    /// A repaired script still failed required-field validation.
    ///
    /// This cannot happen by construction; hitting it means the repair logic
    /// and the schema have drifted apart, which is a defect.
    #[display("Repaired script failed validation: {}", _0)]
    SchemaMismatch(String),
}

/// Error type for structured script handling.
///
/// # Examples
///
/// ```
/// use hogarth_error::{ScriptError, ScriptErrorKind};
///
/// let err = ScriptError::new(ScriptErrorKind::MalformedStructure("panels is a string".into()));
/// assert!(format!("{}", err).contains("Malformed"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Script Error: {} at line {} in {}", kind, line, file)]
pub struct ScriptError {
    /// The specific error condition
    pub kind: ScriptErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ScriptError {
    /// Create a new ScriptError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ScriptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
