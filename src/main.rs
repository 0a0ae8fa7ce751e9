//! Worldgen Server
//!
//! HTTP backend that generates and simulates text-adventure worlds by
//! delegating every game decision to a chat-completion model.

use std::net::SocketAddr;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use worldgen_server::api;
use worldgen_server::config::ServerConfig;
use worldgen_server::state::AppState;
use worldgen_server::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    info!("Worldgen Server v{}", VERSION);

    // Load configuration
    let config = ServerConfig::load().await?;
    info!(
        "Configuration loaded from: {}",
        config.config_path.display()
    );

    let state = AppState::new(config)?;
    info!(
        world_model = %state.config.llm.world_model,
        engine_model = %state.config.llm.engine_model,
        "Application state initialized"
    );

    let static_dir = state.config.static_dir.clone();
    let static_dir = if static_dir.is_dir() {
        info!("Serving static files from: {}", static_dir.display());
        Some(static_dir)
    } else {
        warn!(
            "Static directory {} not found, /static disabled",
            static_dir.display()
        );
        None
    };

    let router = api::create_router(state.api_state(), static_dir.as_deref());

    let addr: SocketAddr = state.config.listen_address().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP API listening on: {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("Server shutdown complete. Goodbye!");
    Ok(())
}

/// Initialize the logging/tracing system
fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,worldgen_server=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
