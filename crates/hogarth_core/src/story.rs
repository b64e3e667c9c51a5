//! Story artifact produced by the prose pipeline.

use serde::{Deserialize, Serialize};

/// A generated story.
///
/// The revision counter matches the owning run's attempt count: 0 for a
/// first draft, incremented by exactly one per rewriter pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// The story prose, title included
    pub content: String,
    /// Number of rewrites this content has been through
    #[serde(default)]
    pub revision: u32,
}

impl Story {
    /// Wrap freshly written prose as an unrevised draft.
    pub fn draft(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            revision: 0,
        }
    }

    /// Produce the next revision of this story with new content.
    pub fn revised(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            revision: self.revision + 1,
        }
    }
}
