//! Error types for the Diligence SDK.

use diligence_domain::IdentifierError;
use thiserror::Error;

/// SDK operation errors
#[derive(Debug, Error)]
pub enum SdkError {
    /// Input rejected before any request was sent
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    /// Connection error (network, DNS, timeout, etc.)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Server answered with a non-success status
    #[error("Server error (HTTP {status}): {error}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, or the raw body
        error: String,
    },

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Search lifecycle step not allowed from the current state
    #[error("Cannot {action} while {from}")]
    InvalidTransition {
        /// State the transition was attempted from
        from: &'static str,
        /// Attempted step
        action: &'static str,
    },
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SdkError::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            SdkError::Status {
                status: status.as_u16(),
                error: e.to_string(),
            }
        } else {
            SdkError::ConnectionError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::InvalidResponse(format!("JSON parsing error: {}", e))
    }
}
