//! Message types for generative requests.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single text message in a generative request.
///
/// The workflow pipelines are text-only: prompts go out as user messages and
/// model output comes back as plain text.
///
/// # Examples
///
/// ```
/// use hogarth_core::{Message, Role};
///
/// let message = Message {
///     role: Role::User,
///     content: "Write a story.".to_string(),
/// };
///
/// assert_eq!(message.role, Role::User);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    #[builder(setter(into))]
    pub content: String,
}

impl Message {
    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
