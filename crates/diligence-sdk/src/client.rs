//! Diligence client implementation.

use crate::error::SdkError;
use crate::results::{SearchResults, SourceOutcome};
use crate::state::SearchState;
use diligence_domain::{AnalysisResult, ErrorBody, Identifier, LookupEnvelope, RegistrySource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-request timeout; a lookup includes a completion call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Opinion text shown when the consolidated opinion request fails
pub const OPINION_FAILURE: &str = "error processing data";

/// Server health as reported by `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerHealth {
    /// "healthy" or "degraded"
    pub status: String,
    /// Number of registry sources served
    pub sources: usize,
    /// Registry key present on the server
    pub registry_configured: bool,
    /// Completion key present on the server
    pub completion_configured: bool,
}

impl ServerHealth {
    /// Both credentials are configured
    pub fn is_healthy(&self) -> bool {
        self.registry_configured && self.completion_configured
    }
}

/// Diligence SDK client
#[derive(Debug, Clone)]
pub struct DiligenceClient {
    server_url: String,
    http: reqwest::Client,
}

impl DiligenceClient {
    /// Create a new client for the server at `server_url`
    pub fn new(server_url: &str) -> Result<Self, SdkError> {
        Self::with_timeout(server_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self, SdkError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(server_url, http))
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(server_url: &str, http: reqwest::Client) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Server base URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Check server health and credential status
    pub async fn health(&self) -> Result<ServerHealth, SdkError> {
        let url = format!("{}/health", self.server_url);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Look up one source for an identifier
    pub async fn lookup(
        &self,
        source: RegistrySource,
        identifier: &Identifier,
    ) -> Result<LookupEnvelope, SdkError> {
        let url = format!("{}/api/{}", self.server_url, source.segment());
        debug!(%url, %source, "lookup request");

        let response = self
            .http
            .get(&url)
            .query(&[(identifier.query_param(), identifier.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Query all four sources concurrently and settle every branch.
    ///
    /// Returns once the slowest lookup finishes; a failing source is
    /// recorded as [`SourceOutcome::Failed`] and never affects the others.
    pub async fn search(&self, identifier: &Identifier) -> SearchResults {
        let (ceis, cnep, cepim, leniencia) = tokio::join!(
            self.settle(RegistrySource::Ceis, identifier),
            self.settle(RegistrySource::Cnep, identifier),
            self.settle(RegistrySource::Cepim, identifier),
            self.settle(RegistrySource::Leniencia, identifier),
        );

        SearchResults::new(identifier.clone(), [ceis, cnep, cepim, leniencia])
    }

    async fn settle(&self, source: RegistrySource, identifier: &Identifier) -> SourceOutcome {
        match self.lookup(source, identifier).await {
            Ok(envelope) => SourceOutcome::Found(envelope),
            Err(e) => {
                warn!(%source, identifier = %identifier, error = %e, "source lookup failed");
                SourceOutcome::Failed(e.to_string())
            }
        }
    }

    /// POST an arbitrary payload to the analysis endpoint
    pub async fn analyze(&self, payload: &Value) -> Result<AnalysisResult, SdkError> {
        let url = format!("{}/api/analyze-compliance", self.server_url);
        debug!(%url, "analysis request");

        let response = self.http.post(&url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Consolidated opinion over all sources of a search.
    ///
    /// Any failure yields [`OPINION_FAILURE`] instead of an error.
    pub async fn request_opinion(&self, results: &SearchResults) -> String {
        let payload = results.consolidated_payload().into_value();
        match self.analyze(&payload).await {
            Ok(result) => result.ai_analysis,
            Err(e) => {
                warn!(identifier = %results.identifier(), error = %e, "consolidated opinion failed");
                OPINION_FAILURE.to_string()
            }
        }
    }

    /// Run a search through the lifecycle: validate the input, fan out,
    /// settle the state.
    ///
    /// Invalid input settles the state as failed without sending anything.
    pub async fn run_search(&self, state: &mut SearchState, input: &str) -> Result<(), SdkError> {
        state.begin_search(input)?;

        let identifier = match Identifier::parse(input) {
            Ok(identifier) => identifier,
            Err(e) => {
                state.fail_search(e.to_string())?;
                return Err(e.into());
            }
        };

        let results = self.search(&identifier).await;
        state.finish_search(results)
    }

    /// Request the consolidated opinion for the populated state
    pub async fn run_opinion(&self, state: &mut SearchState) -> Result<(), SdkError> {
        state.request_opinion()?;
        let opinion = match state.results() {
            Some(results) => self.request_opinion(results).await,
            None => OPINION_FAILURE.to_string(),
        };
        state.finish_opinion(opinion)
    }
}

/// Build a status error from a non-success response
async fn status_error(response: reqwest::Response) -> SdkError {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    let error = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    SdkError::Status { status, error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = DiligenceClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.server_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_run_search_rejects_invalid_input() {
        // Nothing listens here; the input must be rejected before any request
        let client = DiligenceClient::new("http://127.0.0.1:1").unwrap();
        let mut state = SearchState::default();

        let err = client.run_search(&mut state, "123").await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidIdentifier(_)));
        assert!(matches!(state, SearchState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_run_opinion_requires_results() {
        let client = DiligenceClient::new("http://127.0.0.1:1").unwrap();
        let mut state = SearchState::default();

        let err = client.run_opinion(&mut state).await.unwrap_err();
        assert!(matches!(err, SdkError::InvalidTransition { .. }));
    }
}
