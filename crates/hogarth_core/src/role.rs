//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Sender role for a generative request message.
///
/// # Examples
///
/// ```
/// use hogarth_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages carry the assembled prompt
    User,
    /// Assistant messages are model output fed back as context
    Assistant,
}
