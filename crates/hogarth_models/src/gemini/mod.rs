//! Google Gemini backend.

mod client;

pub use client::{GeminiClient, GeminiConfig};
