use api_rest::{AppState, build_router};
use gateway_core::GatewayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Health Gateway.
///
/// Resolves configuration once from the environment (and an optional `.env` file), wires every
/// delegate and service, then serves the REST API.
///
/// # Environment Variables
/// - `GATEWAY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `GATEWAY_DATA_DIR`: Directory for profile, comment, note and dependent storage
/// - `AUTH_JWT_SECRET`, `AUTH_AUDIENCE`: bearer token validation
/// - `CLIENT_REGISTRY_URL`, `PHSA_BASE_URL`, `PHSA_SYSTEM_TOKEN`, `BCMAILPLUS_BASE_URL`: upstreams
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gateway_run=info".parse()?)
                .add_directive("gateway_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_lookup(|key| std::env::var(key).ok())?;
    let state = AppState::from_config(&config)?;

    tracing::info!("++ Starting Health Gateway REST on {}", config.rest_addr());

    let listener = tokio::net::TcpListener::bind(config.rest_addr()).await?;
    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
