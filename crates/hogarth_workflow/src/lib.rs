//! Quality-gated revision workflow engine for generated webtoon content.
//!
//! This crate is the control-flow core of Hogarth. It drives any
//! "produce → judge → optionally improve" generation task through a bounded
//! number of iterations:
//!
//! ```text
//! PENDING → WRITING → EVALUATING → (REWRITING → EVALUATING)? → DONE | FAILED
//! ```
//!
//! The same engine shape is instantiated twice: once for prose stories and
//! once for structured webtoon scripts. Structured generator output passes
//! through a schema-repair layer that fills missing required fields with
//! deterministic defaults before validation, so generator flakiness never
//! reaches the rest of the pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use hogarth_workflow::{WorkflowService, WorkflowSettings};
//! use hogarth_core::{SourcePost, StoryMood};
//! use hogarth_models::GeminiClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> hogarth_error::HogarthResult<()> {
//! let driver = Arc::new(GeminiClient::from_env()?);
//! let service = WorkflowService::new(driver, WorkflowSettings::default());
//!
//! let post = SourcePost::new("t3_abc", "My neighbor's cat adopted me", "");
//! let run_id = service.submit_story(post, StoryMood::SliceOfLife).await;
//!
//! let status = service.status(&run_id).await?;
//! println!("{:?}", status.phase);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod extraction;
mod generate;
mod prompts;
mod registry;
mod repair;
mod script;
mod service;
mod settings;
mod state;
mod story;

pub use engine::{RevisionEngine, RevisionOutcome, RevisionSteps, RunHandle};
pub use extraction::{extract_json, parse_value};
pub use registry::RunRegistry;
pub use repair::{RepairReport, RepairedField, infer_gender, repair_script};
pub use script::{ScriptInput, ScriptSteps, rubric_evaluate};
pub use service::WorkflowService;
pub use settings::{RevisionPolicy, WorkflowSettings, WorkflowSettingsBuilder};
pub use state::{FailureInfo, Phase, RunId, RunSnapshot, RunState, WorkflowKind};
pub use story::{StoryInput, StorySteps, parse_story_evaluation};
