//! Response types returned as JSON by the store and the `holes` binary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Response from `holes stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StoreStats {
    pub holes: u64,
    pub replies: u64,
    /// Total stored snapshots across both entity types.
    pub snapshots: u64,
}

/// Result of rebuilding a store from trail files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RebuildSummary {
    pub trail_files: u32,
    pub records_replayed: u32,
    pub entities_restored: u32,
    pub duration_ms: u64,
}

/// Error body printed by the binary. `code` is the stable discriminant of
/// the store error taxonomy (e.g. `dangling_reference`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
