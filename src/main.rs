mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::MemoryStore;
use application::TelemetryService;
use config::Config;
use interface::http::create_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("telemon={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting telemon v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    // Wire the bounded history buffer into the service
    let store = Arc::new(MemoryStore::new(config.history_size));
    let telemetry = Arc::new(TelemetryService::new(store));

    info!(
        "✓ Telemetry service initialized (history capacity: {})",
        config.history_size
    );

    // Create HTTP server
    let app = create_router(telemetry);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ telemon listening on {}", addr);
    info!("  → Dashboard: http://localhost:{}", config.port);
    info!("  → Ingest:    POST http://localhost:{}/telemetry", config.port);
    info!("  → Latest:    GET  http://localhost:{}/telemetry/latest", config.port);
    info!("  → History:   GET  http://localhost:{}/telemetry/history?limit=N", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
