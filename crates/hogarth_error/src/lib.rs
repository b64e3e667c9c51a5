//! Error types for the Hogarth generation workflow engine.
//!
//! This crate provides the foundation error types used throughout the Hogarth
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The taxonomy mirrors the failure classes of the generation pipeline:
//! infrastructure failures ([`GenerationError`], [`EvaluationError`],
//! [`ScriptError`]) terminate a workflow run, while content-quality
//! conditions (low scores, repairable schema gaps) are absorbed by the
//! engine and never appear here.
//!
//! # Examples
//!
//! ```
//! use hogarth_error::{HogarthResult, HttpError};
//!
//! fn fetch_data() -> HogarthResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod evaluation;
mod generation;
mod http;
mod json;
mod script;
mod workflow;

pub use config::ConfigError;
pub use error::{HogarthError, HogarthErrorKind, HogarthResult};
pub use evaluation::{EvaluationError, EvaluationErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use script::{ScriptError, ScriptErrorKind};
pub use workflow::{WorkflowError, WorkflowErrorKind};
