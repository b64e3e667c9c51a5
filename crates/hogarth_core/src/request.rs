//! Request and response types for LLM generation.

use crate::Message;
use serde::{Deserialize, Serialize};

/// Generic text generation request.
///
/// # Examples
///
/// ```
/// use hogarth_core::{GenerateRequest, Message, Role};
///
/// let request = GenerateRequest {
///     messages: vec![Message {
///         role: Role::User,
///         content: "Hello!".to_string(),
///     }],
///     max_tokens: Some(100),
///     temperature: Some(0.7),
///     model: Some("gemini-2.0-flash-exp".to_string()),
/// };
///
/// assert_eq!(request.messages.len(), 1);
/// assert_eq!(request.max_tokens, Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, derive_builder::Builder)]
#[builder(default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    pub messages: Vec<Message>,
    /// Maximum number of tokens to generate
    pub max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Model identifier to use
    pub model: Option<String>,
}

impl GenerateRequest {
    /// Build a single-turn request from one user prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            ..Default::default()
        }
    }
}

/// The unified response object.
///
/// # Examples
///
/// ```
/// use hogarth_core::GenerateResponse;
///
/// let response = GenerateResponse {
///     text: "Hello! How can I help?".to_string(),
/// };
///
/// assert!(!response.text.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text, with multi-part replies joined by newlines
    pub text: String,
}
