//! hostdiff-server: upload, history and comparison of host snapshots.
//!
//! Exposes [`service::HostService`] over an HTTP/JSON API and backs the
//! `hostdiff` command-line tool.

pub mod config;
pub mod error;
mod routes;
pub mod service;
pub mod state;
pub mod validation;

use std::sync::Arc;

use hostdiff_store::FileSnapshotStore;

use config::ServerConfig;
use state::AppState;

pub use error::{ApiError, Result, ServiceError};
pub use service::{HostService, SnapshotInfo};

/// Build the axum Router (useful for testing).
pub fn build_router(state: Arc<AppState>) -> axum::Router {
    routes::build_router(state)
}

/// Open the snapshot store under `data_dir`.
pub fn open_service(data_dir: &str) -> anyhow::Result<HostService> {
    let store = FileSnapshotStore::new(data_dir)?;
    Ok(HostService::new(Arc::new(store)))
}

/// Start the API server and block until shutdown (Ctrl+C).
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = FileSnapshotStore::new(&config.data_dir)?;
    let state = Arc::new(
        AppState::new(Arc::new(store)).with_max_upload_bytes(config.max_upload_bytes),
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        "hostdiff server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("hostdiff server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
