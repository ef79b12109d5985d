//! Repository modules implementing the store's operations.
//!
//! Each module adds methods to `SnapshotStore` via `impl SnapshotStore` blocks.

pub mod entity;
pub mod hole;
pub mod reply;
