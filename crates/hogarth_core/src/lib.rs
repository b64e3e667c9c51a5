//! Core data types for the Hogarth generation workflow engine.
//!
//! This crate provides the foundation data types shared across the Hogarth
//! workspace: the generative request/response model, the source-content and
//! artifact types flowing through the revision workflow, and console
//! telemetry initialization.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod evaluation;
mod message;
mod mood;
mod post;
mod request;
mod role;
mod script;
mod story;
mod telemetry;

pub use evaluation::Evaluation;
pub use message::{Message, MessageBuilder};
pub use mood::{ScriptGenre, StoryMood};
pub use post::SourcePost;
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use script::{CharacterSheet, DialogueLine, Gender, Panel, WebtoonScript};
pub use story::Story;
pub use telemetry::init_telemetry;
