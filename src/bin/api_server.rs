// API Server Binary Entry Point
//
// Purpose: Start the Axum storm-risk API against OpenWeatherMap + Overpass
// Usage: OPEN_WEATHER_API_KEY=... cargo run --bin api_server

use anyhow::Context;
use coastal_storm_risk::{create_router, AppConfig, AppState};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "coastal_storm_risk=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = AppConfig::from_env().context("Invalid configuration")?;

    tracing::info!("Configuration:");
    tracing::info!("  WEATHER_API_URL: {}", config.weather_api_url);
    tracing::info!("  OVERPASS_URL: {}", config.overpass_url);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  HTTP_TIMEOUT_SECS: {}", config.http_timeout.as_secs());
    tracing::info!("  FETCH_RETRIES: {}", config.fetch_retries);
    tracing::info!("  SHELTER_RADIUS_KM: {}", config.shelter_radius_km);

    let port = config.port;

    // Initialize application state (HTTP clients, registry, shelter cache)
    tracing::info!("Initializing application state...");
    let state = AppState::new(config)?;
    tracing::info!("Application state initialized successfully");

    // Create router with all endpoints and middleware
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
