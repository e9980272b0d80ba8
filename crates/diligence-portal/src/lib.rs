//! Diligence Registry Client
//!
//! Thin client for the Portal da Transparência "api-de-dados" sanctions
//! lists. One call, one outbound GET: no caching, no retry.
//!
//! # Example
//!
//! ```no_run
//! use diligence_domain::{Identifier, RegistrySource};
//! use diligence_portal::{PortalClient, PortalConfig};
//!
//! # async fn run() -> Result<(), diligence_portal::PortalError> {
//! let config = PortalConfig::default().with_api_key("my-key");
//! let client = PortalClient::new(config)?;
//! let id = Identifier::parse("11.222.333/0001-81").unwrap();
//! let result = client.fetch(RegistrySource::Ceis, &id).await?;
//! println!("{} record(s)", result.record_count());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod endpoints;

pub use client::PortalClient;
pub use config::PortalConfig;
pub use endpoints::SourceEndpoint;

use thiserror::Error;

/// Header carrying the registry API key
pub const API_KEY_HEADER: &str = "chave-api-dados";

/// Errors from a registry lookup
#[derive(Debug, Error)]
pub enum PortalError {
    /// No API key configured; raised before any network call
    #[error("registry API key is not configured")]
    MissingApiKey,

    /// Registry answered with a non-success status
    #[error("registry returned HTTP {status}")]
    Upstream {
        /// Upstream status code
        status: u16,
        /// Upstream response body, for logging
        body: String,
    },

    /// Request could not be sent or the response not read
    #[error("registry request to {endpoint} failed: {source}")]
    Http {
        /// Endpoint that failed
        endpoint: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Response body was not JSON
    #[error("registry response from {endpoint} is not valid JSON: {source}")]
    Decode {
        /// Endpoint that returned the body
        endpoint: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be built
    #[error("failed to initialize registry client: {0}")]
    Init(String),
}

impl PortalError {
    /// Upstream status code, when the registry answered
    pub fn status(&self) -> Option<u16> {
        match self {
            PortalError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only_for_upstream() {
        let err = PortalError::Upstream {
            status: 403,
            body: "forbidden".to_string(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "registry returned HTTP 403");
        assert_eq!(PortalError::MissingApiKey.status(), None);
    }
}
