// ── Snapshot upload + host history ───────────────────────────────

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::run_blocking;
use crate::error::ApiError;
use crate::service::SnapshotInfo;
use crate::state::AppState;

/// Store the raw request body as the snapshot named by `filename`.
pub async fn upload_snapshot(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<SnapshotInfo>), ApiError> {
    let info = run_blocking(&state, move |service| {
        service.upload_snapshot(&filename, &body)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(info)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub snapshots: Vec<SnapshotInfo>,
}

pub async fn host_history(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let snapshots =
        run_blocking(&state, move |service| service.get_host_history(&address)).await?;
    Ok(Json(HistoryResponse { snapshots }))
}
