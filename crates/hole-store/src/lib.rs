//! # hole-store
//!
//! Versioned, append-only store of forum holes and their replies.
//!
//! Every accepted change to an entity becomes an immutable snapshot named by
//! a per-entity marker (`s0`, `s1`, ...). Readers ask for the latest version,
//! a specific marker, or the full history, and always get an `EntryView`
//! built from one stored snapshot.
//!
//! Tables are per-id locked: ingestion on one id is serialized while other
//! ids proceed in parallel. When a trail directory is configured, every
//! snapshot is appended to `snapshots.jsonl` before it becomes visible, and
//! [`trail::replayer::TrailReplayer`] rebuilds a store from that file.
//!
//! ```
//! use hole_core::entities::{Hole, HoleKind};
//! use hole_core::ids::HoleId;
//! use hole_store::SnapshotStore;
//!
//! let store = SnapshotStore::new();
//! let hole = Hole {
//!     id: HoleId(1),
//!     text: "a".into(),
//!     kind: HoleKind::Text,
//!     timestamp: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
//!     reply: 0,
//!     likenum: 0,
//!     tag: None,
//! };
//! let first = store.ingest_hole(hole.clone()).unwrap();
//! let again = store.ingest_hole(hole).unwrap();
//! assert_eq!(first.snapshot(), again.snapshot());
//! ```

pub mod error;
pub mod history;
pub mod policy;
pub mod repos;
pub mod service;
mod table;
mod test_support;
pub mod trail;

pub use error::StoreError;
pub use history::{AnyHistory, SnapshotHistory};
pub use policy::{ContentChanged, EveryObservation, SnapshotPolicy, TrackedContent};
pub use service::SnapshotStore;
