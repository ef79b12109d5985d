//! JSONL trail writer.
//!
//! Appends `SnapshotRecord` lines to `{trail_dir}/snapshots.jsonl` with
//! `serde_jsonlines::append_json_lines`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use hole_core::entities::Entity;
use hole_core::enums::TrailOp;
use hole_core::snapshot::Snapshot;
use hole_core::trail::{SnapshotRecord, TRAIL_VERSION};

use super::TRAIL_FILE;
use crate::error::StoreError;

/// Appends snapshot records to the trail file.
///
/// The store calls `append()` while holding the entity's row lock and only
/// publishes the snapshot once the line is written.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
    // Appends from different rows must not interleave within a line.
    append_lock: Mutex<()>,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| {
            StoreError::Trail(format!("create {}: {e}", trail_dir.display()))
        })?;
        Ok(Self {
            trail_dir,
            enabled: true,
            append_lock: Mutex::new(()),
        })
    }

    /// Create a disabled writer (for testing or when the trail is off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
            append_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one record to the trail file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the file write fails.
    pub fn append(&self, record: &SnapshotRecord) -> Result<(), StoreError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.trail_path();
        let _guard = self.append_lock.lock().unwrap_or_else(PoisonError::into_inner);
        serde_jsonlines::append_json_lines(&path, [record])
            .map_err(|e| StoreError::Trail(format!("append {}: {e}", path.display())))
    }

    /// The directory where the trail file is stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    /// Full path of the trail file.
    #[must_use]
    pub fn trail_path(&self) -> PathBuf {
        self.trail_dir.join(TRAIL_FILE)
    }
}

/// Build the trail record of a stored snapshot.
pub(crate) fn snapshot_record<E: Entity>(
    snapshot: &Snapshot<E>,
) -> Result<SnapshotRecord, StoreError> {
    let data = serde_json::to_value(&snapshot.entity).map_err(|e| {
        StoreError::Trail(format!(
            "serialize {} {}: {e}",
            E::ENTITY_TYPE,
            snapshot.entity.id()
        ))
    })?;
    Ok(SnapshotRecord {
        v: TRAIL_VERSION,
        ts: snapshot.recorded_at.to_rfc3339(),
        op: if snapshot.tombstone {
            TrailOp::Tombstone
        } else {
            TrailOp::Snapshot
        },
        entity: E::ENTITY_TYPE,
        id: snapshot.entity.id().into(),
        snapshot: snapshot.marker,
        data,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use hole_core::enums::EntityType;
    use hole_core::snapshot::SnapshotMarker;
    use tempfile::TempDir;

    use super::*;
    use crate::test_support::helpers::hole;

    fn record(seq: u64) -> SnapshotRecord {
        let snapshot = Snapshot {
            marker: SnapshotMarker::from_seq(seq),
            entity: hole(7, "hello"),
            tombstone: false,
            recorded_at: Utc::now(),
        };
        snapshot_record(&snapshot).unwrap()
    }

    #[test]
    fn record_carries_entity_and_marker() {
        let record = record(2);
        assert_eq!(record.v, TRAIL_VERSION);
        assert_eq!(record.op, TrailOp::Snapshot);
        assert_eq!(record.entity, EntityType::Hole);
        assert_eq!(record.id, 7);
        assert_eq!(record.snapshot.to_string(), "s2");
        assert_eq!(record.data["text"], "hello");
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let writer = TrailWriter::new(dir.path().join("trail")).unwrap();
        writer.append(&record(0)).unwrap();
        writer.append(&record(1)).unwrap();

        let content = std::fs::read_to_string(writer.trail_path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn disabled_writer_writes_nothing() {
        let writer = TrailWriter::disabled();
        assert!(!writer.is_enabled());
        writer.append(&record(0)).unwrap();
        assert_eq!(writer.trail_dir(), Path::new(""));
    }
}
