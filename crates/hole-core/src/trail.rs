//! JSONL snapshot trail record.
//!
//! Every snapshot the store appends (tombstones included) is recorded as one
//! `SnapshotRecord` line. The in-memory store is rebuildable from these
//! records.
//!
//! The `v` field supports schema versioning: records without a `v` field
//! deserialize with `v == 1` via `#[serde(default)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};
use crate::snapshot::SnapshotMarker;

/// Current trail record version.
pub const TRAIL_VERSION: u32 = 1;

const fn default_trail_version() -> u32 {
    TRAIL_VERSION
}

/// A single snapshot recorded in the JSONL trail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Schema version. Defaults to 1 for records without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// RFC 3339 time the store accepted the snapshot.
    pub ts: String,

    pub op: TrailOp,

    pub entity: EntityType,

    /// Id of the affected entity within its type's namespace.
    pub id: u64,

    pub snapshot: SnapshotMarker,

    /// Full entity state at this snapshot.
    pub data: serde_json::Value,
}
