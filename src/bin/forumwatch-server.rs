//! # ForumWatch Server
//!
//! Serves the forum health cache and delegate history API.
//!
//! ## Usage
//!
//! ```bash
//! # Run with defaults (in-memory stores, port 8080)
//! cargo run --bin forumwatch-server
//!
//! # Run against a specific environment's config files
//! FORUMWATCH_ENV=production cargo run --bin forumwatch-server
//! ```

use anyhow::Context;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use forumwatch_core::bootstrap::ForumWatchService;
use forumwatch_core::config::ConfigManager;
use forumwatch_core::logging;
use forumwatch_core::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match std::env::var("FORUMWATCH_LOG_DIR") {
        Ok(dir) => logging::init_structured_logging_to_dir(PathBuf::from(dir)),
        Err(_) => logging::init_structured_logging(),
    }

    info!("🚀 Starting ForumWatch Server...");
    info!("   Version: {}", env!("CARGO_PKG_VERSION"));

    let manager = ConfigManager::load().context("failed to load configuration")?;
    info!("   Environment: {}", manager.environment());

    let mut service = ForumWatchService::bootstrap(&manager)
        .await
        .context("failed to bootstrap service")?;

    let bind_address = manager.config().web.bind_address.clone();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    info!("🌐 Listening on {}", bind_address);
    info!("   Press Ctrl+C to shutdown gracefully");

    let app = web::create_app(service.app_state.clone());
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("HTTP server exited with error: {}", e);
    }

    info!("🛑 Shutdown signal received, stopping background loops...");
    service.stop().await;
    info!("👋 ForumWatch Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
