//! Language-model analysis results and error bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token usage and model reported by the completion API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    /// Model that produced the completion
    pub model: String,

    /// Tokens in the prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u32>,

    /// Tokens generated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u32>,

    /// Prompt plus completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u32>,
}

/// Opinion generated over a registry payload (or a consolidated payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The analyzed payload, echoed back unchanged
    pub raw_data: Value,

    /// Free-text opinion
    pub ai_analysis: String,

    /// When the analysis was produced (RFC 3339)
    pub timestamp: String,

    /// Correlation id of the analysis request
    pub request_id: String,

    /// Model and token usage
    pub metadata: AnalysisMetadata,
}

/// JSON body of every error response: `{error, details?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short, user-facing message
    pub error: String,

    /// Underlying cause, when there is one worth surfacing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    /// Error without details
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    /// Error with details
    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// What a lookup envelope carries as its analysis.
///
/// The nested analysis step can fail (no data, missing credential, completion
/// failure) without failing the lookup; the error body is embedded instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    /// Analysis succeeded
    Completed(AnalysisResult),
    /// Analysis was rejected or failed
    Failed(ErrorBody),
}

impl AnalysisOutcome {
    /// The generated opinion, if any
    pub fn opinion(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Completed(result) => Some(&result.ai_analysis),
            AnalysisOutcome::Failed(_) => None,
        }
    }

    /// The error text, if the analysis failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Completed(_) => None,
            AnalysisOutcome::Failed(body) => Some(&body.error),
        }
    }
}
