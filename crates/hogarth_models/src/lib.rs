//! LLM provider drivers for the Hogarth workflow engine.
//!
//! Currently ships a single backend: a [`GeminiClient`] speaking the Gemini
//! REST `generateContent` API. Every driver implements
//! [`hogarth_interface::Driver`], so the workflow engine is indifferent to
//! which backend is plugged in.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{GeminiClient, GeminiConfig};
