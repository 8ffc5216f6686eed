use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::application::TelemetryService;

use super::handlers::{
    health_handler, history_handler, ingest_handler, latest_handler, AppState,
};

pub fn create_router(telemetry: Arc<TelemetryService>) -> Router {
    let state = AppState { telemetry };

    Router::new()
        // API routes
        .route("/telemetry", post(ingest_handler))
        .route("/telemetry/latest", get(latest_handler))
        .route("/telemetry/history", get(history_handler))
        .route("/health", get(health_handler))
        // Serve the dashboard
        .fallback_service(ServeDir::new("src/interface/web/static"))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
