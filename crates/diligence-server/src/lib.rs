//! Diligence Server
//!
//! HTTP service behind the lookup client: one lookup endpoint per sanctions
//! list (`GET /api/{source}`), the analysis endpoint
//! (`POST /api/analyze-compliance`) and a health check.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use diligence_llm::OpenAiProvider;
use diligence_portal::PortalClient;
use handlers::{create_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Upstream client could not be built
    #[error("Client initialization error: {0}")]
    Client(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build application state from configuration
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let portal =
        PortalClient::new(config.portal_config()).map_err(|e| ServerError::Client(e.to_string()))?;
    let analyst = OpenAiProvider::new(config.completion_config())
        .map_err(|e| ServerError::Client(e.to_string()))?;

    Ok(AppState::new(portal, analyst))
}

/// Initialize the global tracing subscriber (`RUST_LOG`, default `info`)
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Already initialized is fine (tests, embedding)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the HTTP server
///
/// Validates configuration, builds the upstream clients once, and serves
/// until the process is stopped.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    init_tracing();

    config.validate()?;

    info!("Starting Diligence server");
    info!("Bind address: {}", config.bind_addr());
    info!("Registry: {}", config.registry.base_url);
    info!(
        "Completion: {} (model {})",
        config.completion.base_url, config.completion.model
    );

    let state = build_state(&config)?;
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_without_keys() {
        let state = build_state(&ServerConfig::default()).unwrap();
        assert!(!state.portal.has_api_key());
        assert!(!state.analyst.has_api_key());
    }

    #[tokio::test]
    async fn test_start_server_rejects_missing_credentials() {
        let result = start_server(ServerConfig::default()).await;
        assert!(matches!(result, Err(ServerError::Config(_))));
    }
}
