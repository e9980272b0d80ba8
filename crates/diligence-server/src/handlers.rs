//! HTTP request handlers for the lookup service.
//!
//! One parametrized lookup handler serves all four registry sources; the
//! analysis handler backs both `POST /api/analyze-compliance` and the nested
//! analysis step of every lookup.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use diligence_domain::{
    is_empty_payload, AnalysisOutcome, AnalysisResult, ErrorBody, Identifier, LookupEnvelope,
    RegistrySource,
};
use diligence_llm::{LlmError, OpenAiProvider};
use diligence_portal::{PortalClient, PortalError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Message returned when the registry key is missing
pub const REGISTRY_KEY_MISSING: &str = "registry API key is not configured";

/// Message returned when the completion key is missing
pub const COMPLETION_KEY_MISSING: &str = "completion API key is not configured";

/// Message returned when the analysis endpoint has nothing to analyze
pub const NO_DATA: &str = "no data provided for analysis";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Sanctions registry client
    pub portal: Arc<PortalClient>,
    /// Chat-completion client
    pub analyst: Arc<OpenAiProvider>,
}

impl AppState {
    /// Create state from the two clients
    pub fn new(portal: PortalClient, analyst: OpenAiProvider) -> Self {
        Self {
            portal: Arc::new(portal),
            analyst: Arc::new(analyst),
        }
    }
}

/// Query string of a lookup request
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    /// Organizational registration number (may be masked)
    #[serde(default)]
    pub cnpj: Option<String>,
    /// Personal registration number (may be masked)
    #[serde(default)]
    pub cpf: Option<String>,
}

impl LookupParams {
    /// First non-blank identifier, `cnpj` preferred
    pub fn raw_identifier(&self) -> Option<&str> {
        [self.cnpj.as_deref(), self.cpf.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// "healthy" when both credentials are configured, "degraded" otherwise
    pub status: String,
    /// Number of registry sources served
    pub sources: usize,
    /// Registry key present
    pub registry_configured: bool,
    /// Completion key present
    pub completion_configured: bool,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed identifier
    InvalidIdentifier(String),
    /// Route segment is not a registry source
    UnknownSource(String),
    /// A credential is missing
    Configuration(&'static str),
    /// Registry answered with a non-success status
    Upstream(u16),
    /// Analysis request carried nothing to analyze
    NoData(Option<String>),
    /// Completion call failed
    Processing(String),
    /// Anything else
    Internal(String),
}

impl AppError {
    /// Status code and body this error renders as
    pub fn parts(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::InvalidIdentifier(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_details("invalid identifier", msg.clone()),
            ),
            AppError::UnknownSource(source) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(format!("unknown registry source: {}", source)),
            ),
            AppError::Configuration(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(*msg))
            }
            AppError::Upstream(status) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorBody::new("failed to fetch registry data"),
            ),
            AppError::NoData(details) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: NO_DATA.to_string(),
                    details: details.clone(),
                },
            ),
            AppError::Processing(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::with_details("error processing analysis", msg.clone()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::with_details("internal error", msg.clone()),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.parts();
        (status, Json(body)).into_response()
    }
}

impl From<PortalError> for AppError {
    fn from(e: PortalError) -> Self {
        match e {
            PortalError::MissingApiKey => AppError::Configuration(REGISTRY_KEY_MISSING),
            PortalError::Upstream { status, .. } => AppError::Upstream(status),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => AppError::Configuration(COMPLETION_KEY_MISSING),
            other => AppError::Processing(other.to_string()),
        }
    }
}

/// Run the analysis step over a payload.
///
/// Shared by the analysis endpoint and the nested step of every lookup.
/// `null`, `[]` and `{}` are rejected as carrying no data; scalars such as
/// `false`, `0` or `""` are analyzed like any other payload.
pub async fn analyze_payload(state: &AppState, payload: Value) -> Result<AnalysisResult, AppError> {
    if !state.analyst.has_api_key() {
        return Err(AppError::Configuration(COMPLETION_KEY_MISSING));
    }
    if is_empty_payload(&payload) {
        return Err(AppError::NoData(None));
    }

    let completion = state.analyst.analyze(&payload).await?;

    Ok(AnalysisResult {
        raw_data: payload,
        ai_analysis: completion.text.clone(),
        timestamp: diligence_domain::timestamp_now(),
        request_id: diligence_domain::correlation_id(),
        metadata: completion.metadata(),
    })
}

/// Parse an analysis request body; empty or malformed bodies are rejected
fn parse_analysis_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::NoData(None));
    }
    serde_json::from_slice(body).map_err(|e| AppError::NoData(Some(e.to_string())))
}

/// POST /api/analyze-compliance - Opinion over an arbitrary JSON payload
async fn analyze_compliance(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    // Credential is checked before the body so a misconfigured server never
    // reports input errors.
    if !state.analyst.has_api_key() {
        return Err(AppError::Configuration(COMPLETION_KEY_MISSING));
    }

    let payload = parse_analysis_body(&body)?;
    let result = analyze_payload(&state, payload).await.map_err(|e| {
        warn!(error = ?e, "analysis failed");
        e
    })?;

    Ok(Json(result))
}

/// GET /api/{source}?cnpj=... - Registry lookup followed by its analysis
async fn lookup(
    State(state): State<AppState>,
    Path(source): Path<String>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupEnvelope>, AppError> {
    let source: RegistrySource = source
        .parse()
        .map_err(|_| AppError::UnknownSource(source.clone()))?;

    let raw = params
        .raw_identifier()
        .ok_or_else(|| AppError::InvalidIdentifier("missing cnpj or cpf parameter".to_string()))?;
    let identifier =
        Identifier::parse(raw).map_err(|e| AppError::InvalidIdentifier(e.to_string()))?;

    info!(source = %source, identifier = %identifier, "registry lookup");

    let registry = state.portal.fetch(source, &identifier).await.map_err(|e| {
        warn!(source = %source, error = %e, "registry lookup failed");
        AppError::from(e)
    })?;

    if let Some(reason) = &registry.error {
        info!(source = %source, identifier = %identifier, reason = %reason, "registry returned no data");
    }

    let analysis = match analyze_payload(&state, registry.payload.clone()).await {
        Ok(result) => AnalysisOutcome::Completed(result),
        Err(e) => {
            let (_, body) = e.parts();
            AnalysisOutcome::Failed(body)
        }
    };

    Ok(Json(LookupEnvelope::new(registry, analysis, identifier)))
}

/// GET /health - Credential status
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let registry_configured = state.portal.has_api_key();
    let completion_configured = state.analyst.has_api_key();

    let status = if registry_configured && completion_configured {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthCheckResponse {
        status: status.to_string(),
        sources: RegistrySource::ALL.len(),
        registry_configured,
        completion_configured,
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/api/analyze-compliance", post(analyze_compliance))
        .route("/api/:source", get(lookup))
        .route("/health", get(health_check))
        .with_state(state)
}
