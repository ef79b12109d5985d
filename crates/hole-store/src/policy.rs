//! Snapshot trigger policies.
//!
//! A policy decides whether an ingested candidate for a known id, whose
//! immutable fields already match, becomes a new snapshot or is absorbed as
//! a no-op. Immutability and tombstone checks run before the policy and are
//! not its concern.
//!
//! A policy must only answer "same version" for candidates the caller would
//! accept as a true no-op: the store returns the previous view and keeps no
//! trace of the candidate.

use hole_core::entities::Entity;
use hole_core::enums::{SnapshotPolicyKind, TrackedFields};

pub trait SnapshotPolicy: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether `candidate` must be stored as a new snapshot after `latest`.
    fn is_new_version<E: Entity>(&self, latest: &E, candidate: &E) -> bool;
}

/// New snapshot iff a mutable field differs from the latest snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentChanged;

impl SnapshotPolicy for ContentChanged {
    fn name(&self) -> &'static str {
        "content_changed"
    }

    fn is_new_version<E: Entity>(&self, latest: &E, candidate: &E) -> bool {
        !candidate.same_content(latest)
    }
}

/// One snapshot per ingestion: every observation of an id is a version,
/// even when nothing changed since the last one.
#[derive(Debug, Clone, Copy, Default)]
pub struct EveryObservation;

impl SnapshotPolicy for EveryObservation {
    fn name(&self) -> &'static str {
        "every_observation"
    }

    fn is_new_version<E: Entity>(&self, _latest: &E, _candidate: &E) -> bool {
        true
    }
}

/// New snapshot iff text, tag, or a tracked counter differs. Counters left
/// untracked may move freely without producing versions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackedContent(pub TrackedFields);

impl SnapshotPolicy for TrackedContent {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn is_new_version<E: Entity>(&self, latest: &E, candidate: &E) -> bool {
        !candidate.same_tracked_content(latest, self.0)
    }
}

/// Config-selected policy.
impl SnapshotPolicy for SnapshotPolicyKind {
    fn name(&self) -> &'static str {
        self.as_str()
    }

    fn is_new_version<E: Entity>(&self, latest: &E, candidate: &E) -> bool {
        match self {
            Self::ContentChanged => ContentChanged.is_new_version(latest, candidate),
            Self::EveryObservation => EveryObservation.is_new_version(latest, candidate),
            Self::Fields(tracked) => TrackedContent(*tracked).is_new_version(latest, candidate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::hole;

    #[test]
    fn content_changed_ignores_identical_candidates() {
        let a = hole(1, "a");
        assert!(!ContentChanged.is_new_version(&a, &a.clone()));
        assert!(ContentChanged.is_new_version(&a, &hole(1, "b")));
    }

    #[test]
    fn every_observation_always_versions() {
        let a = hole(1, "a");
        assert!(EveryObservation.is_new_version(&a, &a.clone()));
    }

    #[test]
    fn tracked_content_ignores_untracked_counters() {
        let a = hole(1, "a");
        let mut liked = a.clone();
        liked.likenum += 1;

        let replies_only = TrackedContent(TrackedFields {
            reply: true,
            likenum: false,
        });
        assert!(!replies_only.is_new_version(&a, &liked));
        assert!(TrackedContent(TrackedFields::ALL).is_new_version(&a, &liked));
        assert!(replies_only.is_new_version(&a, &hole(1, "b")));

        let mut replied = a.clone();
        replied.reply += 1;
        assert!(replies_only.is_new_version(&a, &replied));
    }

    #[test]
    fn configured_kind_dispatches() {
        let a = hole(1, "a");
        assert!(!SnapshotPolicyKind::ContentChanged.is_new_version(&a, &a.clone()));
        assert!(SnapshotPolicyKind::EveryObservation.is_new_version(&a, &a.clone()));
        assert_eq!(SnapshotPolicyKind::EveryObservation.name(), "every_observation");

        let mut liked = a.clone();
        liked.likenum += 1;
        let counters_off = SnapshotPolicyKind::Fields(TrackedFields::NONE);
        assert!(!counters_off.is_new_version(&a, &liked));
        assert_eq!(counters_off.name(), "fields");
    }
}
