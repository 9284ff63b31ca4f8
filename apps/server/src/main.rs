//! # Finvo Server
//!
//! HTTP API binary: loads configuration, opens the database, serves the app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Server Startup                                 │
//! │                                                                         │
//! │  tracing init ──► config ──► database + migrations ──► bind ──► serve   │
//! │                                                                         │
//! │  SIGINT / SIGTERM drains in-flight requests before exit.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finvo_db::{Database, DbConfig};
use finvo_server::config::ServerConfig;
use finvo_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG overrides the default filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting Finvo server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        db = %config.database_path,
        "Configuration loaded"
    );

    // Open the database; migrations run inside Database::new
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let (total, applied) = finvo_db::migrations::migration_status(db.pool()).await?;
    info!(applied, total, "Database ready");

    let state = AppState::new(db, config.clone());
    let router = app(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Starting HTTP server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
