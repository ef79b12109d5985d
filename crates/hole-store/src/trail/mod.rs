//! JSONL snapshot trail writer and replayer.
//!
//! Every snapshot the store appends is written to `<dir>/snapshots.jsonl`
//! before readers can see it. A store is rebuildable from the trail.

pub mod replayer;
pub mod writer;

/// File name of the trail inside its directory.
pub const TRAIL_FILE: &str = "snapshots.jsonl";
