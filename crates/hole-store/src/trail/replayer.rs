use std::path::{Path, PathBuf};

use hole_core::responses::RebuildSummary;
use hole_core::trail::{SnapshotRecord, TRAIL_VERSION};

use crate::error::StoreError;
use crate::policy::SnapshotPolicy;
use crate::service::SnapshotStore;

pub struct TrailReplayer;

impl TrailReplayer {
    /// Restore `store` from every `*.jsonl` file in `trail_dir`.
    ///
    /// Files are replayed in name order, lines in file order. Each record
    /// must carry the next marker of its id, so a trail with gaps, reordered
    /// lines, or records past a tombstone is rejected. Replayed snapshots are
    /// not written back to the trail and do not count against the history
    /// bound.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` for unreadable files, unsupported record
    /// versions, or out-of-order markers, and `DanglingReference` for a reply
    /// whose hole is absent from the trail.
    pub fn rebuild<P: SnapshotPolicy>(
        store: &SnapshotStore<P>,
        trail_dir: &Path,
    ) -> Result<RebuildSummary, StoreError> {
        let start = std::time::Instant::now();

        let files = trail_files(trail_dir)?;
        let mut records_replayed = 0u32;
        let mut entities_restored = 0u32;

        for path in &files {
            let records = serde_jsonlines::json_lines::<SnapshotRecord, _>(path)
                .map_err(|e| StoreError::Trail(format!("open {}: {e}", path.display())))?;

            for (line, record) in records.enumerate() {
                let record = record.map_err(|e| {
                    StoreError::Trail(format!("{}:{}: {e}", path.display(), line + 1))
                })?;
                if record.v != TRAIL_VERSION {
                    return Err(StoreError::Trail(format!(
                        "Unsupported trail version {} for {} {}",
                        record.v, record.entity, record.id
                    )));
                }

                if store.restore(&record)? {
                    entities_restored += 1;
                }
                records_replayed += 1;
            }
        }

        let summary = RebuildSummary {
            trail_files: u32::try_from(files.len()).unwrap_or(u32::MAX),
            records_replayed,
            entities_restored,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        tracing::info!(
            "rebuilt {} entities from {} records in {} trail files",
            summary.entities_restored,
            summary.records_replayed,
            summary.trail_files
        );
        Ok(summary)
    }
}

/// `*.jsonl` files of `trail_dir`, sorted by name. A missing directory holds
/// no files.
fn trail_files(trail_dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !trail_dir.exists() {
        tracing::warn!("trail directory {} does not exist", trail_dir.display());
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(trail_dir)
        .map_err(|e| StoreError::Trail(format!("read {}: {e}", trail_dir.display())))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StoreError::Trail(format!("read {}: {e}", trail_dir.display())))?
            .path();
        if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
