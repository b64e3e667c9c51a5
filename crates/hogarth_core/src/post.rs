//! Source content delivered by the ingestion collaborator.

use serde::{Deserialize, Serialize};

/// A source post handed to the story pipeline.
///
/// The body may be empty; title-only posts are valid input and prompt
/// assembly substitutes the title for the missing body.
///
/// # Examples
///
/// ```
/// use hogarth_core::SourcePost;
///
/// let post = SourcePost::new("t3_abc", "AITA for naming my cat Chairman?", "");
/// assert!(post.body.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_new::new)]
pub struct SourcePost {
    /// Provider-side post id
    #[new(into)]
    pub id: String,
    /// Post title
    #[new(into)]
    pub title: String,
    /// Post body, possibly empty
    #[new(into)]
    pub body: String,
}
