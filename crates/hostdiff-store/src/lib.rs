//! hostdiff-store: Persistence for uploaded host snapshots.
//!
//! Snapshots are stored verbatim, one record per (address, capture timestamp)
//! pair. Each record carries a BLAKE3 hash of its bytes so that tampering on
//! disk is detected on read. Computed diff reports are never stored.

pub mod hash;
pub mod store;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use store::{FileSnapshotStore, SnapshotStore, StoreError};

/// Namespace UUID for deterministic snapshot IDs.
const HOSTDIFF_NS: Uuid = Uuid::from_bytes([
    0x3f, 0x1c, 0x9e, 0x52, 0x7a, 0x04, 0x4d, 0x8b, 0x9c, 0x61, 0x2e, 0xd0, 0x15, 0xa8, 0x4b, 0x77,
]);

// ── Core Types ───────────────────────────────────────────────────

/// Unique identifier for a stored snapshot.
///
/// Derived from (address, timestamp), so the same upload always maps to the
/// same ID.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SnapshotId(pub Uuid);

impl SnapshotId {
    pub fn for_capture(address: &str, timestamp: &str) -> Self {
        Self(Uuid::new_v5(
            &HOSTDIFF_NS,
            format!("snapshot:{address}:{timestamp}").as_bytes(),
        ))
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnapshotId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Metadata describing a stored snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub id: SnapshotId,
    /// Host address the snapshot was uploaded for.
    pub address: String,
    /// Normalized ISO-8601 capture time.
    pub timestamp: String,
    /// When the snapshot was written to the store.
    pub stored_at: DateTime<Utc>,
    /// Size of the raw snapshot in bytes.
    pub size: u64,
    /// BLAKE3 content hash (hex) of the raw bytes.
    pub content_hash: String,
}

/// A stored snapshot together with its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub meta: SnapshotMeta,
    pub data: Vec<u8>,
}

impl StoredSnapshot {
    /// Verify that the stored content hash matches the bytes.
    pub fn verify_integrity(&self) -> bool {
        self.meta.content_hash == hash::content_hash(&self.data)
    }
}
