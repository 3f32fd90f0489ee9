// ── Snapshot comparison ──────────────────────────────────────────

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use hostdiff_core::DiffReport;

use super::run_blocking;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn compare_snapshots(
    State(state): State<Arc<AppState>>,
    Path((id, other_id)): Path<(String, String)>,
) -> Result<Json<DiffReport>, ApiError> {
    let report = run_blocking(&state, move |service| {
        service.compare_snapshots(&id, &other_id)
    })
    .await?;
    Ok(Json(report))
}
