//! Registry client implementation.

use crate::config::PortalConfig;
use crate::endpoints::SourceEndpoint;
use crate::{PortalError, API_KEY_HEADER};
use diligence_domain::{Identifier, RegistryResult, RegistrySource};
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the sanctions-list endpoints
#[derive(Debug, Clone)]
pub struct PortalClient {
    config: PortalConfig,
    http: reqwest::Client,
}

impl PortalClient {
    /// Create a client from configuration.
    ///
    /// A missing API key is not an error here; it is reported by
    /// [`PortalClient::fetch`] before any request is sent.
    pub fn new(config: PortalConfig) -> Result<Self, PortalError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PortalError::Init(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.config.api_key().is_some()
    }

    /// Configuration in use
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// Fetch the first result page of one list for one identifier.
    ///
    /// # Errors
    ///
    /// - [`PortalError::MissingApiKey`] when no key is configured (nothing is sent)
    /// - [`PortalError::Upstream`] on a non-2xx status
    /// - [`PortalError::Http`] / [`PortalError::Decode`] on transport or parse failure
    pub async fn fetch(
        &self,
        source: RegistrySource,
        identifier: &Identifier,
    ) -> Result<RegistryResult, PortalError> {
        let api_key = self.config.api_key().ok_or(PortalError::MissingApiKey)?;

        let endpoint = SourceEndpoint::for_source(source);
        let url = endpoint.url(&self.config.base_url, identifier);
        debug!(source = %source, url = %url, "fetching registry data");

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| PortalError::Http {
                endpoint: endpoint.path(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(source = %source, status = status.as_u16(), "registry returned an error status");
            return Err(PortalError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| PortalError::Http {
            endpoint: endpoint.path(),
            source: e,
        })?;
        let payload = serde_json::from_slice(&bytes).map_err(|e| PortalError::Decode {
            endpoint: endpoint.path(),
            source: e,
        })?;

        Ok(RegistryResult::new(source, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        // Unroutable base URL: any attempted request would surface as Http
        let config = PortalConfig::default().with_base_url("http://127.0.0.1:1");
        let client = PortalClient::new(config).unwrap();
        assert!(!client.has_api_key());

        let id = Identifier::parse("11222333000181").unwrap();
        let result = client.fetch(RegistrySource::Ceis, &id).await;
        assert!(matches!(result, Err(PortalError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_connection_error() {
        let config = PortalConfig::default()
            .with_base_url("http://127.0.0.1:1")
            .with_api_key("key");
        let client = PortalClient::new(config).unwrap();

        let id = Identifier::parse("11222333000181").unwrap();
        let result = client.fetch(RegistrySource::Cnep, &id).await;
        assert!(matches!(result, Err(PortalError::Http { .. })));
    }
}
