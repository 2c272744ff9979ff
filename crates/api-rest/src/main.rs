//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when only the REST surface (with OpenAPI/Swagger UI) is wanted. The
//! workspace's `gateway-run` binary is the deployed entry point.

use api_rest::{build_router, AppState};
use gateway_core::GatewayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Health Gateway REST API server.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_lookup(|key| std::env::var(key).ok())?;
    let state = AppState::from_config(&config)?;

    tracing::info!("-- Starting Health Gateway REST API on {}", config.rest_addr());

    let listener = tokio::net::TcpListener::bind(config.rest_addr()).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
