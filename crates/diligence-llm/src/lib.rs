//! Diligence LLM Layer
//!
//! Chat-completion client that turns a registry payload into a written risk
//! opinion.
//!
//! # Architecture
//!
//! - `prompt`: the fixed reviewer persona and the user instruction embedding
//!   the pretty-printed payload
//! - `openai`: `OpenAiProvider`, one POST to `/chat/completions` per analysis
//!
//! No retry, no streaming; the only budget enforced is the `max_tokens` cap
//! sent with the request.

#![warn(missing_docs)]

pub mod openai;
pub mod prompt;

use diligence_domain::AnalysisMetadata;
use thiserror::Error;

pub use openai::{CompletionConfig, OpenAiProvider};

/// Text returned when the model produced no content
pub const NO_ANALYSIS_FALLBACK: &str = "no analysis could be generated";

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured; raised before any network call
    #[error("completion API key is not configured")]
    MissingApiKey,

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Completion API answered with a non-success status
    #[error("completion API returned HTTP {status}: {message}")]
    Api {
        /// Upstream status code
        status: u16,
        /// Upstream error message
        message: String,
    },

    /// Invalid response from the completion API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Payload could not be serialized into the prompt
    #[error("Prompt construction failed: {0}")]
    Prompt(String),
}

/// Token usage reported by the completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    /// Prompt tokens
    pub prompt_tokens: Option<u32>,
    /// Generated tokens
    pub completion_tokens: Option<u32>,
    /// Total tokens
    pub total_tokens: Option<u32>,
}

/// One finished completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Text of the first choice, or [`NO_ANALYSIS_FALLBACK`]
    pub text: String,
    /// Model reported by the API
    pub model: String,
    /// Token usage, if reported
    pub usage: TokenUsage,
}

impl Completion {
    /// Model and usage in the shape analysis responses carry
    pub fn metadata(&self) -> AnalysisMetadata {
        AnalysisMetadata {
            model: self.model.clone(),
            prompt_tokens: self.usage.prompt_tokens,
            completion_tokens: self.usage.completion_tokens,
            total_tokens: self.usage.total_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_metadata() {
        let completion = Completion {
            text: "ok".to_string(),
            model: "gpt-3.5-turbo-0125".to_string(),
            usage: TokenUsage {
                prompt_tokens: Some(100),
                completion_tokens: Some(20),
                total_tokens: Some(120),
            },
        };

        let metadata = completion.metadata();
        assert_eq!(metadata.model, "gpt-3.5-turbo-0125");
        assert_eq!(metadata.prompt_tokens, Some(100));
        assert_eq!(metadata.total_tokens, Some(120));
    }

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            LlmError::MissingApiKey.to_string(),
            "completion API key is not configured"
        );
    }
}
