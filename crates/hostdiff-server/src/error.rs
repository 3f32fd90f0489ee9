//! Error types for the hostdiff-server crate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hostdiff_engine::DecodeError;
use hostdiff_store::StoreError;
use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors surfaced by [`crate::service::HostService`] operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid filename: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid snapshot content: {0}")]
    InvalidSnapshot(#[source] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Snapshot {label} with ID {id} not found")]
    NotFound { label: &'static str, id: String },

    #[error("Cannot compare snapshots from different addresses: {a} vs {b}")]
    AddressMismatch { a: String, b: String },

    #[error("Snapshot already exists for {address} at {timestamp}")]
    Conflict { address: String, timestamp: String },

    #[error("Storage error: {0}")]
    Store(StoreError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { address, timestamp } => Self::Conflict { address, timestamp },
            other => Self::Store(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

// ── HTTP mapping ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

/// JSON error response for the HTTP API.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_key) = match &self.0 {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "invalid_filename"),
            ServiceError::InvalidSnapshot(_) => (StatusCode::BAD_REQUEST, "invalid_snapshot"),
            ServiceError::Decode(_) => (StatusCode::BAD_REQUEST, "undecodable_snapshot"),
            ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ServiceError::AddressMismatch { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "address_mismatch")
            }
            ServiceError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            ServiceError::Store(_) | ServiceError::Task(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let message = match &self.0 {
            ServiceError::Store(e) => {
                // Log the real error server-side, keep the response generic.
                tracing::error!(error = %e, "Snapshot store failure");
                "internal server error".to_string()
            }
            ServiceError::Task(e) => {
                tracing::error!(error = %e, "Blocking snapshot task failed");
                "internal server error".to_string()
            }
            other => {
                tracing::warn!(error = %other, status = status.as_u16(), "Request failed");
                other.to_string()
            }
        };

        (
            status,
            Json(ApiErrorBody {
                error: error_key.into(),
                message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_failed_task_maps_to_generic_500() {
        let join_err = tokio::task::spawn_blocking(|| panic!("worker died"))
            .await
            .unwrap_err();

        let resp = ApiError::from(ServiceError::from(join_err)).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(resp).await;
        assert_eq!(json["error"], "internal_error");
        assert_eq!(json["message"], "internal server error");
    }

    #[tokio::test]
    async fn test_conflict_maps_to_409() {
        let err = ServiceError::from(StoreError::Conflict {
            address: "10.0.0.1".into(),
            timestamp: "2025-01-01T00:00:00Z".into(),
        });
        let resp = ApiError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["error"], "conflict");
    }
}
