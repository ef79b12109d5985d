//! Hole repository: ingestion, lookups, history, redaction.

use chrono::{DateTime, Utc};
use hole_core::entities::Hole;
use hole_core::entry::HoleEntry;
use hole_core::enums::EntityType;
use hole_core::ids::HoleId;
use hole_core::snapshot::SnapshotMarker;

use crate::error::StoreError;
use crate::history::SnapshotHistory;
use crate::policy::SnapshotPolicy;
use crate::service::{SnapshotStore, not_found};

impl<P: SnapshotPolicy> SnapshotStore<P> {
    /// Ingest an observed hole and return the view of its current version.
    ///
    /// # Errors
    ///
    /// `InvalidContentKind` for a malformed kind, `ImmutableFieldViolation`
    /// if `kind` or `timestamp` differ from the stored hole, `Redacted`,
    /// `Overloaded`, or `Trail`.
    pub fn ingest_hole(&self, hole: Hole) -> Result<HoleEntry, StoreError> {
        self.ingest_hole_observed(hole, Utc::now())
    }

    /// Ingest a hole seen at `observed_at`, such as the time a feed page was
    /// served. A new version is stamped with that time instead of now.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ingest_hole`].
    pub fn ingest_hole_observed(
        &self,
        hole: Hole,
        observed_at: DateTime<Utc>,
    ) -> Result<HoleEntry, StoreError> {
        self.ingest_into(&self.holes, hole, observed_at)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the hole was never ingested.
    pub fn latest_hole(&self, id: HoleId) -> Result<HoleEntry, StoreError> {
        self.holes.latest(id).ok_or_else(|| not_found::<Hole>(id))
    }

    /// # Errors
    ///
    /// Returns `StoreError::UnknownSnapshot` if `marker` never named a
    /// version of this hole.
    pub fn hole_at(&self, id: HoleId, marker: SnapshotMarker) -> Result<HoleEntry, StoreError> {
        self.holes
            .at(id, marker)
            .ok_or_else(|| StoreError::UnknownSnapshot {
                entity_type: EntityType::Hole,
                id: id.into(),
                snapshot: marker.to_string(),
            })
    }

    /// Every version of the hole, oldest first; empty for unknown ids.
    #[must_use]
    pub fn hole_history(&self, id: HoleId) -> SnapshotHistory<Hole> {
        self.holes.history(id)
    }

    /// Close the hole's history with a tombstone.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown hole, or `Trail`.
    pub fn redact_hole(&self, id: HoleId) -> Result<HoleEntry, StoreError> {
        self.redact_in(&self.holes, id)
    }
}
