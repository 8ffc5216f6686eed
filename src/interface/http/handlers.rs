use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::application::{SamplePayload, TelemetryService, DEFAULT_HISTORY_LIMIT, REQUIRED_FIELDS};
use crate::domain::{sample::VALID_STATES, TelemetryError, TelemetrySample};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<TelemetryService>,
}

/// Maps the error taxonomy onto HTTP responses. Client-input errors are 400s
/// naming the failing category; an empty buffer is a 404, not a fault; and
/// anything unexpected collapses to a detail-free 500.
#[derive(Debug)]
pub struct ApiError(pub TelemetryError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            TelemetryError::MissingFields(_) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "Missing required fields",
                    "required": REQUIRED_FIELDS,
                }),
            ),
            TelemetryError::InvalidState(_) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "Invalid machineState",
                    "validStates": VALID_STATES,
                }),
            ),
            TelemetryError::InvalidType(field) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "Numeric fields must be numbers",
                    "field": field,
                }),
            ),
            TelemetryError::InvalidLimit => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "error": "Invalid limit parameter" }),
            ),
            TelemetryError::Empty => (
                StatusCode::NOT_FOUND,
                serde_json::json!({ "error": "No telemetry data available" }),
            ),
            TelemetryError::Internal(detail) => {
                error!("internal failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<TelemetryError> for ApiError {
    fn from(err: TelemetryError) -> Self {
        ApiError(err)
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        ApiError(TelemetryError::Internal(err.to_string()))
    }
}

/// Response for POST /telemetry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub success: bool,
    pub message: String,
    pub data_points_stored: usize,
}

/// Response for GET /telemetry/history
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub total: usize,
    pub data: Vec<TelemetrySample>,
}

/// Response for GET /health
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub data_points: usize,
    pub uptime: u64,
}

/// Query params for GET /telemetry/history. `limit` stays a raw string so a
/// non-numeric value becomes our 400, not an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

impl HistoryQuery {
    fn parse_limit(&self) -> Result<usize, TelemetryError> {
        match &self.limit {
            None => Ok(DEFAULT_HISTORY_LIMIT),
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|n| *n > 0)
                .map(|n| n as usize)
                .ok_or(TelemetryError::InvalidLimit),
        }
    }
}

/// Handler for POST /telemetry
#[debug_handler]
pub async fn ingest_handler(
    State(state): State<AppState>,
    Json(payload): Json<SamplePayload>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    let stored = state.telemetry.ingest(payload)?;
    debug!("sample accepted, {} stored", stored);

    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            success: true,
            message: "Telemetry data received".to_string(),
            data_points_stored: stored,
        }),
    ))
}

/// Handler for GET /telemetry/latest
#[debug_handler]
pub async fn latest_handler(
    State(state): State<AppState>,
) -> Result<Json<TelemetrySample>, ApiError> {
    Ok(Json(state.telemetry.latest()?))
}

/// Handler for GET /telemetry/history
#[debug_handler]
pub async fn history_handler(
    State(state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = params.parse_limit()?;
    let window = state.telemetry.history(limit);

    Ok(Json(HistoryResponse {
        count: window.data.len(),
        total: window.total,
        data: window.data,
    }))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        data_points: state.telemetry.data_points(),
        uptime: state.telemetry.uptime_seconds(),
    })
}
