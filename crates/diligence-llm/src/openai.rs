//! OpenAI Chat Completions Provider
//!
//! Sends one request per analysis to an OpenAI-compatible
//! `/chat/completions` endpoint.
//!
//! # Examples
//!
//! ```no_run
//! use diligence_llm::{CompletionConfig, OpenAiProvider};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), diligence_llm::LlmError> {
//! let provider = OpenAiProvider::new(CompletionConfig::default().with_api_key("sk-..."))?;
//! let completion = provider.analyze(&json!([{"id": 1}])).await?;
//! println!("{}", completion.text);
//! # Ok(())
//! # }
//! ```

use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::{Completion, LlmError, TokenUsage, NO_ANALYSIS_FALLBACK};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default cap on generated tokens
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Completion client configuration.
///
/// `Debug` redacts the API key.
#[derive(Clone)]
pub struct CompletionConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Bearer credential
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Cap on generated tokens
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CompletionConfig {
    /// Point the client at another base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use another model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The API key, if present and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Chat message
#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
    total_tokens: Option<u32>,
}

/// Error envelope returned by the API on failure
#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Chat-completion provider for compliance analysis
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    config: CompletionConfig,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new provider.
    ///
    /// A missing API key is reported by [`OpenAiProvider::analyze`], before
    /// any request is sent.
    pub fn new(config: CompletionConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.config.api_key().is_some()
    }

    /// Configured model
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate an opinion over `payload`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured (nothing is sent)
    /// - Network communication fails
    /// - The API answers with a non-success status
    /// - Response format is invalid
    pub async fn analyze(&self, payload: &Value) -> Result<Completion, LlmError> {
        let api_key = self.config.api_key().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(payload)?,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(model = %self.config.model, "requesting completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), "completion API returned an error status");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .unwrap_or_else(|| NO_ANALYSIS_FALLBACK.to_string());

        let usage = completion
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();
        debug!(total_tokens = ?usage.total_tokens, "completion received");

        Ok(Completion {
            text,
            model: completion
                .model
                .unwrap_or_else(|| self.config.model.clone()),
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompletionConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_tokens, 1000);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_provider_creation() {
        let provider =
            OpenAiProvider::new(CompletionConfig::default().with_model("gpt-4")).unwrap();
        assert_eq!(provider.model(), "gpt-4");
        assert!(!provider.has_api_key());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = CompletionConfig::default().with_api_key("sk-secret");
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "system",
                content: "persona".to_string(),
            }],
            temperature: 0.5,
            max_tokens: 1000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["temperature"], 0.5);
        assert_eq!(value["max_tokens"], 1000);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let provider = OpenAiProvider::new(
            CompletionConfig::default().with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();

        let result = provider.analyze(&serde_json::json!([{"id": 1}])).await;
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_connection_error() {
        let provider = OpenAiProvider::new(
            CompletionConfig::default()
                .with_base_url("http://127.0.0.1:1")
                .with_api_key("sk-test"),
        )
        .unwrap();

        match provider.analyze(&serde_json::json!({"a": 1})).await {
            Err(LlmError::Communication(_)) => {} // Expected
            _ => panic!("Expected Communication error"),
        }
    }
}
