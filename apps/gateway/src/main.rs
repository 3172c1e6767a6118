mod auth;
mod backend;
mod config;
mod errors;
mod proxy;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing API_URL / JWT_SECRET)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Iklavya gateway v{}", env!("CARGO_PKG_VERSION"));

    let backend = BackendClient::new(&config.api_url, config.backend_connect_timeout)
        .context("Failed to build backend HTTP client")?;
    info!(
        "Backend client initialized (base: {}, production cookies: {})",
        config.api_url,
        config.environment.is_production()
    );

    match &config.static_dir {
        Some(dir) => info!("Serving pages from {}", dir.display()),
        None => info!("STATIC_DIR not set; only /api and /health are served"),
    }

    let port = config.port;
    let state = AppState::new(config, backend);

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
