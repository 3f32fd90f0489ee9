// ── Route registration ───────────────────────────────────────────

mod diff;
mod snapshots;
mod system;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ServiceError};
use crate::service::HostService;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/api/system/health", get(system::health_check))
        // Upload takes a filename in the slot where diff takes an id; the
        // router requires one parameter name per segment.
        .route("/api/snapshots/{id}", post(snapshots::upload_snapshot))
        .route(
            "/api/hosts/{address}/snapshots",
            get(snapshots::host_history),
        )
        .route("/api/snapshots/{id}/diff/{other_id}", get(diff::compare_snapshots))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run a service call on the blocking pool. Store operations do synchronous
/// file I/O and must not hold up the async workers.
async fn run_blocking<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&HostService) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || op(&service))
        .await
        .map_err(ServiceError::from)?;
    Ok(result?)
}
