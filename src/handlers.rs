use crate::config::Config;
use crate::errors::AppError;
use crate::ledger::VerificationLedger;
use crate::models::{HealthStatus, LookupRequest, VerificationReport};
use crate::prospeo_client::ProspeoClient;
use crate::relay::RelayService;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the email-finder endpoint.
    pub client: ProspeoClient,
    /// Request counter and call log.
    pub ledger: VerificationLedger,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = ProspeoClient::new(config.upstream_url.clone(), config.upstream_timeout())?;
        Ok(Self {
            config,
            client,
            ledger: VerificationLedger::new(),
        })
    }
}

/// POST /api/email-finder
///
/// Relays a name + company lookup to the email-finder service and returns
/// its JSON response with an added `_meta` object.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<Value>), AppError>` - 200 with the enhanced body,
///   400 for missing fields, 500 when the upstream call fails.
pub async fn email_finder(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("Malformed lookup body: {}", rejection.body_text());
        AppError::BadRequest(rejection.body_text())
    })?;
    tracing::debug!("POST /api/email-finder - {:?}", request);

    let body = RelayService::new(&state.client, &state.ledger)
        .lookup(request)
        .await?;

    Ok((StatusCode::OK, Json(body)))
}

/// GET /api/verification-report
///
/// Counters and the last few calls, for checking what was actually sent upstream.
pub async fn verification_report(State(state): State<Arc<AppState>>) -> Json<VerificationReport> {
    Json(state.ledger.report())
}

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.ledger.health())
}
