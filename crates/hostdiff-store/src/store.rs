//! Snapshot storage: trait plus file-system implementation.
//!
//! Snapshots are stored as raw bytes next to a JSON metadata record keyed by
//! snapshot ID. Per-host marker directories, named by a hash of the address,
//! back the history listing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{hash, SnapshotId, SnapshotMeta, StoredSnapshot};

/// Errors that can occur during snapshot storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Snapshot already exists for {address} at {timestamp}")]
    Conflict { address: String, timestamp: String },

    #[error("Snapshot not found: {0}")]
    NotFound(SnapshotId),

    #[error("Integrity check failed for snapshot {0}: stored hash does not match content")]
    IntegrityViolation(SnapshotId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for snapshot persistence backends.
pub trait SnapshotStore: Send + Sync {
    /// Store a new snapshot. Fails with [`StoreError::Conflict`] if a snapshot
    /// for the same (address, timestamp) already exists.
    fn insert(
        &self,
        address: &str,
        timestamp: &str,
        data: &[u8],
    ) -> Result<SnapshotMeta, StoreError>;

    /// Retrieve a snapshot by ID, verifying integrity.
    fn get(&self, id: SnapshotId) -> Result<StoredSnapshot, StoreError>;

    /// List snapshots for an address, ordered by timestamp descending.
    fn list_by_address(&self, address: &str) -> Result<Vec<SnapshotMeta>, StoreError>;
}

/// File-system backed snapshot store.
///
/// ```text
/// {root}/
///   records/
///     {snapshot_id}.json            committed record (SnapshotMeta + data file name)
///     {snapshot_id}.{nonce}.bin     raw uploaded bytes
///   hosts/
///     {address hash}/{snapshot_id}  membership marker for list_by_address
/// ```
///
/// A snapshot exists once its `records/{id}.json` exists. The record is fully
/// written under a private temporary name and then hard-linked into place,
/// which fails if the target already exists. Concurrent inserts of the same
/// (address, timestamp) therefore have exactly one winner, and an insert that
/// dies part-way leaves only private files behind, never a claimed slot.
pub struct FileSnapshotStore {
    records: PathBuf,
    hosts: PathBuf,
}

/// On-disk form of a committed snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct Record {
    #[serde(flatten)]
    meta: SnapshotMeta,
    /// File name of the raw bytes inside `records/`.
    data_file: String,
}

impl FileSnapshotStore {
    /// Create a new store rooted at the given directory.
    /// Creates the directory tree if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let records = root.join("records");
        let hosts = root.join("hosts");
        fs::create_dir_all(&records)?;
        fs::create_dir_all(&hosts)?;
        Ok(Self { records, hosts })
    }

    fn record_path(&self, id: SnapshotId) -> PathBuf {
        self.records.join(format!("{id}.json"))
    }

    fn host_path(&self, address: &str) -> PathBuf {
        self.hosts.join(hash::address_dir(address))
    }

    fn read_record(&self, id: SnapshotId) -> Result<Record, StoreError> {
        match fs::read(self.record_path(id)) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the data and the record under private names, then link the
    /// record into place. Returns the data file name. On failure the private
    /// files are removed again.
    fn commit(&self, meta: &SnapshotMeta, data: &[u8], nonce: &str) -> Result<String, StoreError> {
        let data_file = format!("{}.{nonce}.bin", meta.id);
        let data_path = self.records.join(&data_file);
        let staged_record = self.records.join(format!("{}.{nonce}.json.tmp", meta.id));

        let result = self.link_record(meta, data, &data_path, &data_file, &staged_record);

        remove_quietly(&staged_record);
        match result {
            Ok(()) => Ok(data_file),
            Err(e) => {
                remove_quietly(&data_path);
                Err(e)
            }
        }
    }

    fn link_record(
        &self,
        meta: &SnapshotMeta,
        data: &[u8],
        data_path: &Path,
        data_file: &str,
        staged_record: &Path,
    ) -> Result<(), StoreError> {
        write_synced(data_path, data)?;

        let record = Record {
            meta: meta.clone(),
            data_file: data_file.to_string(),
        };
        write_synced(staged_record, &serde_json::to_vec_pretty(&record)?)?;

        match fs::hard_link(staged_record, self.record_path(meta.id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(StoreError::Conflict {
                address: meta.address.clone(),
                timestamp: meta.timestamp.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn insert(
        &self,
        address: &str,
        timestamp: &str,
        data: &[u8],
    ) -> Result<SnapshotMeta, StoreError> {
        let id = SnapshotId::for_capture(address, timestamp);
        if self.record_path(id).exists() {
            return Err(StoreError::Conflict {
                address: address.to_string(),
                timestamp: timestamp.to_string(),
            });
        }

        // Marker first: list_by_address skips markers without a record.
        let host_dir = self.host_path(address);
        fs::create_dir_all(&host_dir)?;
        fs::write(host_dir.join(id.to_string()), b"")?;

        let meta = SnapshotMeta {
            id,
            address: address.to_string(),
            timestamp: timestamp.to_string(),
            stored_at: Utc::now(),
            size: data.len() as u64,
            content_hash: hash::content_hash(data),
        };

        let nonce = Uuid::new_v4().simple().to_string();
        let data_file = self.commit(&meta, data, &nonce)?;

        tracing::debug!(
            snapshot_id = %id,
            address = %address,
            timestamp = %timestamp,
            data_file = %data_file,
            "Snapshot saved"
        );

        Ok(meta)
    }

    fn get(&self, id: SnapshotId) -> Result<StoredSnapshot, StoreError> {
        let record = self.read_record(id)?;
        let data = fs::read(self.records.join(&record.data_file))?;

        let snapshot = StoredSnapshot {
            meta: record.meta,
            data,
        };
        if !snapshot.verify_integrity() {
            return Err(StoreError::IntegrityViolation(id));
        }

        Ok(snapshot)
    }

    fn list_by_address(&self, address: &str) -> Result<Vec<SnapshotMeta>, StoreError> {
        let dir = self.host_path(address);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();
        for entry in fs::read_dir(&dir)?.flatten() {
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<SnapshotId>().ok())
            else {
                continue;
            };

            let meta = match self.read_record(id) {
                Ok(record) => record.meta,
                // Insert in flight or abandoned before commit.
                Err(StoreError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            };
            // Guard against address hash collisions.
            if meta.address == address {
                results.push(meta);
            }
        }

        // Sort by timestamp descending
        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(results)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staged snapshot file");
        }
    }
}
