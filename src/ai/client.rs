use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::json;

use super::AiError;

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "KIDSPARK_AI_MODEL";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The single capability the app consumes: a prompt in, free-form text out.
/// Implementations must be callable from background threads.
pub trait ContentProvider: Send + Sync {
    fn generate_content(&self, prompt: &str) -> Result<String, AiError>;
}

/// Gemini REST client. Requests are blocking; the UI never calls this
/// directly, it goes through [`crate::ai::fetch`] on a worker thread.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build from `GEMINI_API_KEY` (required) and `KIDSPARK_AI_MODEL`
    /// (optional).
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| AiError::MissingApiKey { var: API_KEY_VAR })?;
        let model = std::env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_owned());
        Self::new(api_key, model)
    }

    pub fn new(api_key: String, model: String) -> Result<Self, AiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        info!("AI content provider ready (model {model})");
        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

impl ContentProvider for GeminiClient {
    fn generate_content(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        debug!("requesting content ({} chars of prompt)", prompt.len());
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            warn!("provider returned {status}");
            return Err(AiError::Status {
                status: status.as_u16(),
            });
        }
        let body: serde_json::Value = response.json()?;
        let text = body["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(AiError::Empty);
        }
        Ok(text)
    }
}

/// A provider that fails every call; used when no API key is configured so
/// the UI degrades to its "try again" state instead of crashing.
struct Unconfigured;

impl ContentProvider for Unconfigured {
    fn generate_content(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::MissingApiKey { var: API_KEY_VAR })
    }
}

/// The provider the app runs with: Gemini when a key is configured,
/// otherwise a stub whose errors drive the retry affordances.
pub fn provider_from_env() -> Arc<dyn ContentProvider> {
    match GeminiClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(err) => {
            warn!("AI features degraded: {err}");
            Arc::new(Unconfigured)
        }
    }
}
