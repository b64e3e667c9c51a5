//! Google Gemini REST API implementation.
//!
//! This client speaks the `generateContent` endpoint directly over
//! `reqwest`. There is no automatic retry here: the workflow engine treats
//! any provider failure as terminal for the current step, so the client's
//! job is to make exactly one attempt and map the outcome faithfully onto
//! the [`GenerationError`] taxonomy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::instrument;

use hogarth_core::{GenerateRequest, GenerateResponse, Role};
use hogarth_error::{GenerationError, GenerationErrorKind, HogarthResult};
use hogarth_interface::Driver;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for the generative language API
    pub api_key: String,
    /// Default model used when a request carries no override
    pub model: String,
    /// Base URL of the API (overridable for tests)
    pub base_url: String,
    /// Transport-level timeout per request
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Build a configuration from the `GEMINI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns a missing-key [`GenerationError`] when the variable is unset
    /// or empty.
    pub fn from_env() -> HogarthResult<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey))?;
        Ok(Self::new(api_key))
    }

    /// Build a configuration with defaults around an explicit key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the base URL (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the transport timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the Gemini `generateContent` REST endpoint.
///
/// # Example
///
/// ```no_run
/// use hogarth_models::{GeminiClient, GeminiConfig};
/// use hogarth_core::GenerateRequest;
/// use hogarth_interface::Driver;
///
/// # async fn example() -> hogarth_error::HogarthResult<()> {
/// let client = GeminiClient::new(GeminiConfig::from_env()?)?;
/// let response = client
///     .generate(&GenerateRequest::from_prompt("Write a haiku about rain."))
///     .await?;
/// println!("{}", response.text);
/// # Ok(())
/// # }
/// ```
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a provider-kind [`GenerationError`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: GeminiConfig) -> HogarthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Provider(format!(
                    "failed to build HTTP client: {e}"
                )))
            })?;
        Ok(Self { http, config })
    }

    /// Create a client configured from the environment.
    ///
    /// # Errors
    ///
    /// Fails when `GEMINI_API_KEY` is unset.
    pub fn from_env() -> HogarthResult<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url, model
        )
    }
}

#[async_trait]
impl Driver for GeminiClient {
    #[instrument(skip(self, req), fields(provider = "gemini", model))]
    async fn generate(&self, req: &GenerateRequest) -> HogarthResult<GenerateResponse> {
        let model = req.model.as_deref().unwrap_or(&self.config.model);
        tracing::Span::current().record("model", model);

        let payload = build_payload(req);
        let response = self
            .http
            .post(self.endpoint(model))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| map_transport_error(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(map_status_error(status.as_u16(), message).into());
        }

        let body: GeminiResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Provider(format!(
                "failed to decode provider response: {e}"
            )))
        })?;

        let text = extract_text(&body);
        if text.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse).into());
        }

        tracing::debug!(chars = text.len(), "Gemini reply received");
        Ok(GenerateResponse { text })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

//
// ─── WIRE TYPES ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct GeminiPayload {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_payload(req: &GenerateRequest) -> GeminiPayload {
    let contents = req
        .messages
        .iter()
        .map(|m| Content {
            // Gemini knows only "user" and "model"; system context rides
            // along as a user turn.
            role: match m.role {
                Role::Assistant => "model".to_string(),
                Role::User | Role::System => "user".to_string(),
            },
            parts: vec![Part {
                text: m.content.clone(),
            }],
        })
        .collect();

    let generation_config = if req.temperature.is_some() || req.max_tokens.is_some() {
        Some(GenerationConfig {
            temperature: req.temperature,
            max_output_tokens: req.max_tokens,
        })
    } else {
        None
    };

    GeminiPayload {
        contents,
        generation_config,
    }
}

fn extract_text(body: &GeminiResponse) -> String {
    let texts: Vec<&str> = body
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .map(|p| p.text.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    texts.join("\n")
}

fn map_status_error(status_code: u16, message: String) -> GenerationError {
    match status_code {
        401 | 403 => GenerationError::new(GenerationErrorKind::Auth(message)),
        429 => GenerationError::new(GenerationErrorKind::RateLimit(message)),
        _ => GenerationError::new(GenerationErrorKind::Http {
            status_code,
            message,
        }),
    }
}

fn map_transport_error(err: reqwest::Error, timeout: Duration) -> GenerationError {
    if err.is_timeout() {
        GenerationError::new(GenerationErrorKind::Timeout(timeout.as_secs()))
    } else {
        GenerationError::new(GenerationErrorKind::Provider(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogarth_core::Message;

    fn request() -> GenerateRequest {
        GenerateRequest {
            messages: vec![Message::user("hello")],
            max_tokens: Some(256),
            temperature: Some(0.7),
            model: None,
        }
    }

    #[test]
    fn payload_maps_roles_and_config() {
        let payload = build_payload(&request());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 256);
    }

    #[test]
    fn payload_omits_config_when_unset() {
        let req = GenerateRequest::from_prompt("hi");
        let value = serde_json::to_value(build_payload(&req)).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn assistant_role_maps_to_model() {
        let req = GenerateRequest {
            messages: vec![Message {
                role: Role::Assistant,
                content: "prior reply".into(),
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(build_payload(&req)).unwrap();
        assert_eq!(value["contents"][0]["role"], "model");
    }

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert!(matches!(
            map_status_error(401, String::new()).kind,
            GenerationErrorKind::Auth(_)
        ));
        assert!(matches!(
            map_status_error(429, String::new()).kind,
            GenerationErrorKind::RateLimit(_)
        ));
        assert!(matches!(
            map_status_error(503, String::new()).kind,
            GenerationErrorKind::Http {
                status_code: 503,
                ..
            }
        ));
    }

    #[test]
    fn multi_part_replies_join_with_newlines() {
        let body = GeminiResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: "model".into(),
                    parts: vec![
                        Part { text: "one".into() },
                        Part { text: String::new() },
                        Part { text: "two".into() },
                    ],
                }),
            }],
        };
        assert_eq!(extract_text(&body), "one\ntwo");
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::new(
            GeminiConfig::new("test-key").with_base_url("http://localhost:9999/v1beta"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("gemini-2.0-flash-exp"),
            "http://localhost:9999/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }
}
