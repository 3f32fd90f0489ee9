//! Shared state for the HTTP handlers.

use std::sync::Arc;

use hostdiff_store::SnapshotStore;

use crate::service::HostService;

/// Default cap on uploaded snapshot size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub service: HostService,
    /// Largest accepted request body for snapshot uploads.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            service: HostService::new(store),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}
