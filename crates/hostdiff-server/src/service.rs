//! Host snapshot operations: upload, history, compare.
//!
//! This is the transport-independent surface shared by the HTTP routes and
//! the CLI. Errors from the validator, the store and the engine are surfaced
//! unchanged; nothing is retried.

use std::sync::Arc;

use hostdiff_core::DiffReport;
use hostdiff_engine::Side;
use hostdiff_store::{SnapshotId, SnapshotMeta, SnapshotStore, StoreError, StoredSnapshot};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};
use crate::validation;

/// Public description of a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotInfo {
    pub id: String,
    pub address: String,
    pub timestamp: String,
}

impl From<SnapshotMeta> for SnapshotInfo {
    fn from(meta: SnapshotMeta) -> Self {
        Self {
            id: meta.id.to_string(),
            address: meta.address,
            timestamp: meta.timestamp,
        }
    }
}

/// Snapshot operations over a shared store. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct HostService {
    store: Arc<dyn SnapshotStore>,
}

impl HostService {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self { store }
    }

    /// Validate and store an uploaded snapshot.
    ///
    /// The host address and capture time come from the filename. The content
    /// must decode as a snapshot so that it can later be compared.
    pub fn upload_snapshot(&self, filename: &str, content: &[u8]) -> Result<SnapshotInfo> {
        let parsed = validation::parse_filename(filename)?;

        let snapshot = hostdiff_engine::decode::decode_snapshot(content)
            .map_err(ServiceError::InvalidSnapshot)?;
        if !snapshot.address.is_empty() && snapshot.address != parsed.address {
            tracing::warn!(
                filename = %filename,
                content_address = %snapshot.address,
                "Snapshot content address differs from filename, filename wins"
            );
        }

        let meta = self
            .store
            .insert(&parsed.address, &parsed.timestamp, content)?;

        tracing::info!(
            snapshot_id = %meta.id,
            address = %meta.address,
            timestamp = %meta.timestamp,
            services = snapshot.services.len(),
            "Snapshot uploaded"
        );

        Ok(meta.into())
    }

    /// All snapshots for a host, newest first. Unknown hosts have an empty
    /// history.
    pub fn get_host_history(&self, address: &str) -> Result<Vec<SnapshotInfo>> {
        let snapshots = self.store.list_by_address(address)?;
        tracing::debug!(address = %address, count = snapshots.len(), "Host history listed");
        Ok(snapshots.into_iter().map(SnapshotInfo::from).collect())
    }

    /// Compare two stored snapshots of the same host.
    pub fn compare_snapshots(&self, id_a: &str, id_b: &str) -> Result<DiffReport> {
        let snap_a = self.load("A", id_a)?;
        let snap_b = self.load("B", id_b)?;

        if snap_a.meta.address != snap_b.meta.address {
            return Err(ServiceError::AddressMismatch {
                a: snap_a.meta.address,
                b: snap_b.meta.address,
            });
        }

        let report =
            hostdiff_engine::diff_snapshots(&snap_a.data, &snap_b.data).map_err(|e| {
                for side in e.sides() {
                    let id = match side {
                        Side::A => snap_a.meta.id,
                        Side::B => snap_b.meta.id,
                    };
                    tracing::warn!(snapshot_id = %id, side = %side, "Stored snapshot failed to decode");
                }
                e
            })?;

        tracing::info!(
            address = %snap_a.meta.address,
            snapshot_a = %snap_a.meta.id,
            snapshot_b = %snap_b.meta.id,
            changes = report.change_count(),
            "Snapshots compared"
        );

        Ok(report)
    }

    fn load(&self, label: &'static str, id: &str) -> Result<StoredSnapshot> {
        let not_found = || ServiceError::NotFound {
            label,
            id: id.to_string(),
        };

        let snapshot_id: SnapshotId = id.parse().map_err(|_| not_found())?;
        match self.store.get(snapshot_id) {
            Ok(snapshot) => Ok(snapshot),
            Err(StoreError::NotFound(_)) => Err(not_found()),
            Err(e) => Err(e.into()),
        }
    }
}
