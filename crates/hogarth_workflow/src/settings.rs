//! Workflow behavior settings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable knobs for both generation pipelines.
///
/// All fields have serde defaults, so a partial configuration source (env,
/// file) deserializes cleanly.
///
/// # Examples
///
/// ```
/// use hogarth_workflow::WorkflowSettings;
///
/// let settings = WorkflowSettings::default();
/// assert_eq!(*settings.story_max_attempts(), 1);
/// assert_eq!(*settings.script_max_attempts(), 2);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default)]
pub struct WorkflowSettings {
    /// Minimum evaluator score to accept a story without a rewrite
    #[serde(default = "default_story_threshold")]
    story_threshold: f32,

    /// Maximum rewriter invocations per story run
    #[serde(default = "default_story_max_attempts")]
    story_max_attempts: u32,

    /// Minimum rubric score to accept a script without a rewrite
    #[serde(default = "default_script_threshold")]
    script_threshold: f32,

    /// Maximum rewriter invocations per script run
    #[serde(default = "default_script_max_attempts")]
    script_max_attempts: u32,

    /// Lower bound of the target panel count
    #[serde(default = "default_min_scenes")]
    min_scenes: u32,

    /// Upper bound of the target panel count
    #[serde(default = "default_max_scenes")]
    max_scenes: u32,

    /// Required fraction of panels carrying dialogue
    #[serde(default = "default_dialogue_coverage")]
    dialogue_coverage: f32,

    /// Minimum character count for a complete visual prompt
    #[serde(default = "default_min_prompt_chars")]
    min_prompt_chars: usize,

    /// Deadline for each individual generative call, in seconds
    #[serde(default = "default_step_timeout_secs")]
    step_timeout_secs: u64,

    /// Model override passed on every request; `None` uses the driver default
    #[serde(default)]
    model: Option<String>,

    /// Sampling temperature for generation requests
    #[serde(default = "default_temperature")]
    temperature: f32,

    /// Token budget for generation requests
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_story_threshold() -> f32 {
    7.0
}

fn default_story_max_attempts() -> u32 {
    1
}

fn default_script_threshold() -> f32 {
    7.0
}

fn default_script_max_attempts() -> u32 {
    2
}

fn default_min_scenes() -> u32 {
    8
}

fn default_max_scenes() -> u32 {
    12
}

fn default_dialogue_coverage() -> f32 {
    0.7
}

fn default_min_prompt_chars() -> usize {
    150
}

fn default_step_timeout_secs() -> u64 {
    90
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4000
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            story_threshold: default_story_threshold(),
            story_max_attempts: default_story_max_attempts(),
            script_threshold: default_script_threshold(),
            script_max_attempts: default_script_max_attempts(),
            min_scenes: default_min_scenes(),
            max_scenes: default_max_scenes(),
            dialogue_coverage: default_dialogue_coverage(),
            min_prompt_chars: default_min_prompt_chars(),
            step_timeout_secs: default_step_timeout_secs(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl WorkflowSettings {
    /// Revision policy for the story pipeline.
    pub fn story_policy(&self) -> RevisionPolicy {
        RevisionPolicy::new(self.story_threshold, self.story_max_attempts)
    }

    /// Revision policy for the script pipeline.
    pub fn script_policy(&self) -> RevisionPolicy {
        RevisionPolicy::new(self.script_threshold, self.script_max_attempts)
    }

    /// Deadline applied to each generative call.
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }
}

/// The engine's transition parameters: acceptance threshold plus the hard
/// ceiling on rewriter invocations.
///
/// The ceiling counts Rewriter calls, not total steps, so a run makes at
/// most `2 + 2 * max_attempts` generative-step calls.
#[derive(Debug, Clone, Copy, PartialEq, Getters, derive_new::new)]
pub struct RevisionPolicy {
    /// Minimum score at which an artifact is accepted without revision
    threshold: f32,
    /// Maximum number of rewriter invocations
    max_attempts: u32,
}
