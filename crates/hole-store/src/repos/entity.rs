//! Untyped operations dispatching on `EntityType`.
//!
//! These back the CLI and any caller that only has `(type, id, marker)`
//! triples; the typed methods in `hole` and `reply` do the work.

use chrono::{DateTime, Utc};
use hole_core::entities::{Hole, Reply};
use hole_core::entry::{AnyEntry, Candidate};
use hole_core::enums::{EntityType, TrailOp};
use hole_core::ids::{HoleId, ReplyId};
use hole_core::responses::StoreStats;
use hole_core::snapshot::SnapshotMarker;
use hole_core::trail::SnapshotRecord;

use crate::error::StoreError;
use crate::history::AnyHistory;
use crate::policy::SnapshotPolicy;
use crate::service::SnapshotStore;

impl<P: SnapshotPolicy> SnapshotStore<P> {
    /// Ingest a hole or reply candidate.
    ///
    /// # Errors
    ///
    /// See [`Self::ingest_hole`] and [`Self::ingest_reply`].
    pub fn ingest(&self, candidate: Candidate) -> Result<AnyEntry, StoreError> {
        self.ingest_observed(candidate, Utc::now())
    }

    /// Ingest a candidate seen at `observed_at`.
    ///
    /// # Errors
    ///
    /// See [`Self::ingest_hole`] and [`Self::ingest_reply`].
    pub fn ingest_observed(
        &self,
        candidate: Candidate,
        observed_at: DateTime<Utc>,
    ) -> Result<AnyEntry, StoreError> {
        match candidate {
            Candidate::Hole(hole) => self
                .ingest_hole_observed(hole, observed_at)
                .map(AnyEntry::from),
            Candidate::Reply(reply) => self
                .ingest_reply_observed(reply, observed_at)
                .map(AnyEntry::from),
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown.
    pub fn latest(&self, entity_type: EntityType, id: u64) -> Result<AnyEntry, StoreError> {
        match entity_type {
            EntityType::Hole => self.latest_hole(HoleId(id)).map(AnyEntry::from),
            EntityType::Reply => self.latest_reply(ReplyId(id)).map(AnyEntry::from),
        }
    }

    /// Look up one version by its rendered marker.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownSnapshot` if the marker is malformed, the
    /// id is unknown, or the marker never named a version of the id.
    pub fn at(
        &self,
        entity_type: EntityType,
        id: u64,
        marker: &str,
    ) -> Result<AnyEntry, StoreError> {
        let Ok(parsed) = marker.parse::<SnapshotMarker>() else {
            return Err(StoreError::UnknownSnapshot {
                entity_type,
                id,
                snapshot: marker.to_string(),
            });
        };
        match entity_type {
            EntityType::Hole => self.hole_at(HoleId(id), parsed).map(AnyEntry::from),
            EntityType::Reply => self.reply_at(ReplyId(id), parsed).map(AnyEntry::from),
        }
    }

    /// Every version of the id, oldest first; empty for unknown ids.
    #[must_use]
    pub fn history(&self, entity_type: EntityType, id: u64) -> AnyHistory {
        match entity_type {
            EntityType::Hole => self.hole_history(HoleId(id)).into(),
            EntityType::Reply => self.reply_history(ReplyId(id)).into(),
        }
    }

    /// Append a tombstone to the id's history.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the id is unknown, or `Trail`.
    pub fn redact(&self, entity_type: EntityType, id: u64) -> Result<AnyEntry, StoreError> {
        match entity_type {
            EntityType::Hole => self.redact_hole(HoleId(id)).map(AnyEntry::from),
            EntityType::Reply => self.redact_reply(ReplyId(id)).map(AnyEntry::from),
        }
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let (holes, hole_snapshots) = self.holes.counts();
        let (replies, reply_snapshots) = self.replies.counts();
        StoreStats {
            holes,
            replies,
            snapshots: hole_snapshots + reply_snapshots,
        }
    }

    /// Replay one trail record into the store.
    pub(crate) fn restore(&self, record: &SnapshotRecord) -> Result<bool, StoreError> {
        match record.entity {
            EntityType::Hole => self.restore_into::<Hole>(&self.holes, record),
            EntityType::Reply => {
                // The reference check only matters for the record that creates
                // the reply; `hole` is immutable afterwards.
                if record.op == TrailOp::Snapshot {
                    let reply: Reply = serde_json::from_value(record.data.clone())
                        .map_err(|e| StoreError::Trail(format!("reply {}: invalid data: {e}", record.id)))?;
                    self.check_reference(&reply)?;
                }
                self.restore_into::<Reply>(&self.replies, record)
            }
        }
    }
}
