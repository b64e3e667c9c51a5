//! Application settings layered from the environment.

use derive_getters::Getters;
use hogarth_error::{ConfigError, HogarthResult};
use hogarth_models::{GeminiClient, GeminiConfig};
use hogarth_workflow::WorkflowSettings;
use serde::Deserialize;
use std::time::Duration;

fn default_gemini_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

/// Application settings.
///
/// Loaded from `HOGARTH_*` environment variables layered over defaults,
/// with `__` separating nested fields (e.g.
/// `HOGARTH_WORKFLOW__STORY_THRESHOLD=8.0`). The Gemini API key may also
/// come from the conventional `GEMINI_API_KEY` variable.
#[derive(Debug, Clone, Deserialize, Getters)]
pub struct Settings {
    /// Workflow engine knobs
    #[serde(default)]
    workflow: WorkflowSettings,
    /// Model used for all generative steps
    #[serde(default = "default_gemini_model")]
    gemini_model: String,
    /// API key override; falls back to `GEMINI_API_KEY`
    #[serde(default)]
    gemini_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workflow: WorkflowSettings::default(),
            gemini_model: default_gemini_model(),
            gemini_api_key: None,
        }
    }
}

impl Settings {
    /// Load settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the environment values fail to
    /// deserialize.
    pub fn load() -> HogarthResult<Self> {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("HOGARTH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigError::new(format!("failed to read environment: {e}")))?;

        let settings = source
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("invalid configuration: {e}")))?;
        Ok(settings)
    }

    /// Build a Gemini client from these settings.
    ///
    /// # Errors
    ///
    /// Fails when no API key is configured anywhere.
    pub fn gemini_client(&self) -> HogarthResult<GeminiClient> {
        let config = match &self.gemini_api_key {
            Some(key) => GeminiConfig::new(key.clone()),
            None => GeminiConfig::from_env()?,
        };
        let config = config
            .with_model(self.gemini_model.clone())
            .with_timeout(Duration::from_secs(*self.workflow.step_timeout_secs()));
        GeminiClient::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.gemini_model(), "gemini-2.0-flash-exp");
        assert_eq!(*settings.workflow().story_max_attempts(), 1);
    }
}
