//! Reply repository: ingestion with reference checks, lookups, listings.

use chrono::{DateTime, Utc};
use hole_core::entities::Reply;
use hole_core::entry::ReplyEntry;
use hole_core::enums::EntityType;
use hole_core::ids::{HoleId, ReplyId};
use hole_core::snapshot::SnapshotMarker;

use crate::error::StoreError;
use crate::history::SnapshotHistory;
use crate::policy::SnapshotPolicy;
use crate::service::{SnapshotStore, not_found};

impl<P: SnapshotPolicy> SnapshotStore<P> {
    /// Ingest an observed reply and return the view of its current version.
    ///
    /// Holes are never removed, so a reply accepted once stays consistent.
    ///
    /// # Errors
    ///
    /// `DanglingReference` if its hole was never ingested,
    /// `ImmutableFieldViolation` if `hole`, `name`, `dz` or `timestamp`
    /// differ from the stored reply, `Redacted`, `Overloaded`, or `Trail`.
    pub fn ingest_reply(&self, reply: Reply) -> Result<ReplyEntry, StoreError> {
        self.ingest_reply_observed(reply, Utc::now())
    }

    /// Ingest a reply seen at `observed_at`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::ingest_reply`].
    pub fn ingest_reply_observed(
        &self,
        reply: Reply,
        observed_at: DateTime<Utc>,
    ) -> Result<ReplyEntry, StoreError> {
        self.check_reference(&reply)?;
        self.ingest_into(&self.replies, reply, observed_at)
    }

    pub(crate) fn check_reference(&self, reply: &Reply) -> Result<(), StoreError> {
        if self.holes.contains(reply.hole) {
            Ok(())
        } else {
            tracing::warn!("reply {} references unknown hole {}", reply.id, reply.hole);
            Err(StoreError::DanglingReference {
                reply: reply.id,
                hole: reply.hole,
            })
        }
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the reply was never ingested.
    pub fn latest_reply(&self, id: ReplyId) -> Result<ReplyEntry, StoreError> {
        self.replies.latest(id).ok_or_else(|| not_found::<Reply>(id))
    }

    /// # Errors
    ///
    /// Returns `StoreError::UnknownSnapshot` if `marker` never named a
    /// version of this reply.
    pub fn reply_at(&self, id: ReplyId, marker: SnapshotMarker) -> Result<ReplyEntry, StoreError> {
        self.replies
            .at(id, marker)
            .ok_or_else(|| StoreError::UnknownSnapshot {
                entity_type: EntityType::Reply,
                id: id.into(),
                snapshot: marker.to_string(),
            })
    }

    #[must_use]
    pub fn reply_history(&self, id: ReplyId) -> SnapshotHistory<Reply> {
        self.replies.history(id)
    }

    /// Latest views of every reply on `hole`, ordered by reply id.
    #[must_use]
    pub fn replies_for(&self, hole: HoleId) -> Vec<ReplyEntry> {
        let mut replies = self.replies.latest_matching(|reply| reply.hole == hole);
        replies.sort_by_key(|entry| entry.entry().id);
        replies
    }

    /// Close the reply's history with a tombstone.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown reply, or `Trail`.
    pub fn redact_reply(&self, id: ReplyId) -> Result<ReplyEntry, StoreError> {
        self.redact_in(&self.replies, id)
    }
}
