//! # contracts-sidecar — Binary Entry Point
//!
//! Loads the schema registry and starts the Axum HTTP server.
//! Configured from `HOST`, `PORT` (default 8079) and `SCHEMA_DIR`
//! (default `contracts/schemas`).

use contracts_api::{AppConfig, AppState};
use contracts_schema::SchemaRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    // A partially loaded registry must never serve traffic.
    let registry = SchemaRegistry::load(&config.schema_dir).map_err(|e| {
        tracing::error!("Schema registry load failed: {e}");
        e
    })?;
    if registry.is_empty() {
        tracing::warn!(
            dir = %config.schema_dir.display(),
            "no schemas found; every validate request will be rejected"
        );
    }

    let app = contracts_api::app(AppState::new(registry));

    let addr = config.listen_addr();
    tracing::info!("Contracts sidecar listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
