//! Unified facade for the Hogarth generation pipeline.
//!
//! Re-exports the workspace crates behind one dependency: error types,
//! core data model, the driver seam, the Gemini backend, and the revision
//! workflow engine with its schema-repair layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use hogarth::{Settings, WorkflowService, SourcePost, StoryMood};
//! use std::sync::Arc;
//!
//! # async fn example() -> hogarth::HogarthResult<()> {
//! let settings = Settings::load()?;
//! let driver = Arc::new(settings.gemini_client()?);
//! let service = WorkflowService::new(driver, settings.workflow().clone());
//!
//! let post = SourcePost::new("t3_abc", "My neighbor's cat adopted me", "");
//! let run_id = service.submit_story(post, StoryMood::SliceOfLife).await;
//! println!("submitted {run_id}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;

pub use settings::Settings;

pub use hogarth_core::{
    CharacterSheet, DialogueLine, Evaluation, Gender, GenerateRequest, GenerateResponse, Message,
    Panel, Role, ScriptGenre, SourcePost, Story, StoryMood, WebtoonScript, init_telemetry,
};
pub use hogarth_error::{HogarthError, HogarthErrorKind, HogarthResult};
pub use hogarth_interface::Driver;
pub use hogarth_models::{GeminiClient, GeminiConfig};
pub use hogarth_workflow::{
    Phase, RevisionEngine, RevisionOutcome, RevisionSteps, RunId, RunRegistry, RunSnapshot,
    WorkflowKind, WorkflowService, WorkflowSettings, repair_script,
};
