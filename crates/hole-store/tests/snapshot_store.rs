//! Snapshot store integration tests.
//!
//! - Ingestion: idempotence, monotonic history, immutability, references
//! - Policies: content-driven default, one snapshot per observation,
//!   tracked counters
//! - Bounds and tombstones

use chrono::DateTime;
use pretty_assertions::assert_eq;
use rstest::rstest;

use hole_core::entities::{Hole, HoleKind, Reply};
use hole_core::enums::{EntityType, SnapshotPolicyKind, TrackedFields};
use hole_core::ids::{HoleId, ReplyId};
use hole_core::snapshot::SnapshotMarker;
use hole_store::{EveryObservation, SnapshotStore, StoreError, TrackedContent};

fn hole(id: u64, text: &str) -> Hole {
    Hole {
        id: HoleId(id),
        text: text.to_string(),
        kind: HoleKind::Text,
        timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        reply: 0,
        likenum: 0,
        tag: None,
    }
}

fn reply(id: u64, hole: u64, text: &str) -> Reply {
    Reply {
        id: ReplyId(id),
        hole: HoleId(hole),
        name: "Alice".to_string(),
        text: text.to_string(),
        dz: false,
        timestamp: DateTime::from_timestamp(1_700_000_060, 0).unwrap(),
        tag: None,
    }
}

fn markers(store: &SnapshotStore, id: u64) -> Vec<String> {
    store
        .hole_history(HoleId(id))
        .iter()
        .map(|entry| entry.snapshot().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Worked example
// ---------------------------------------------------------------------------

#[test]
fn worked_example() {
    let store = SnapshotStore::new();

    let first = store.ingest_hole(hole(1, "a")).unwrap();
    assert_eq!(first.snapshot().to_string(), "s0");

    let again = store.ingest_hole(hole(1, "a")).unwrap();
    assert_eq!(again.snapshot().to_string(), "s0");

    let edited = store.ingest_hole(hole(1, "b")).unwrap();
    assert_eq!(edited.snapshot().to_string(), "s1");
    assert_eq!(edited.entry().text, "b");

    let old = store.at(EntityType::Hole, 1, "s0").unwrap();
    assert_eq!(serde_json::to_value(&old).unwrap()["entry"]["text"], "a");

    let ok = store.ingest_reply(reply(10, 1, "hi")).unwrap();
    assert_eq!(ok.snapshot(), SnapshotMarker::FIRST);

    let err = store.ingest_reply(reply(11, 999, "lost")).unwrap_err();
    assert_eq!(err.code(), "dangling_reference");
}

// ---------------------------------------------------------------------------
// Ingestion properties
// ---------------------------------------------------------------------------

#[test]
fn repeated_identical_ingestion_is_idempotent() {
    let store = SnapshotStore::new();
    let first = store.ingest_hole(hole(1, "a")).unwrap();
    for _ in 0..5 {
        assert_eq!(store.ingest_hole(hole(1, "a")).unwrap(), first);
    }
    assert_eq!(markers(&store, 1), vec!["s0"]);
}

#[test]
fn history_is_monotonic_and_restartable() {
    let store = SnapshotStore::new();
    for text in ["a", "b", "b", "c", "a"] {
        store.ingest_hole(hole(1, text)).unwrap();
    }

    let history = store.hole_history(HoleId(1));
    let seqs: Vec<u64> = history.iter().map(|entry| entry.snapshot().seq()).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3]);

    let texts: Vec<String> = history.iter().map(|entry| entry.into_entry().text).collect();
    assert_eq!(texts, vec!["a", "b", "c", "a"]);
    assert_eq!(history.iter().next_back().unwrap().entry().text, "a");
}

#[test]
fn counters_and_tag_produce_snapshots() {
    let store = SnapshotStore::new();
    store.ingest_hole(hole(1, "a")).unwrap();

    let mut liked = hole(1, "a");
    liked.likenum = 3;
    assert_eq!(store.ingest_hole(liked.clone()).unwrap().snapshot().seq(), 1);

    liked.tag = Some("NSFW".to_string());
    assert_eq!(store.ingest_hole(liked.clone()).unwrap().snapshot().seq(), 2);

    // Counters may go down; the store keeps whatever it observed.
    liked.likenum = 1;
    let latest = store.ingest_hole(liked).unwrap();
    assert_eq!(latest.snapshot().seq(), 3);
    assert_eq!(latest.entry().likenum, 1);
}

#[rstest]
#[case::kind(
    |h: &mut Hole| h.kind = HoleKind::audio("https://cdn.example/a.mp3").unwrap(),
    "kind"
)]
#[case::timestamp(
    |h: &mut Hole| h.timestamp = DateTime::from_timestamp(1_800_000_000, 0).unwrap(),
    "timestamp"
)]
fn immutable_hole_fields(#[case] change: fn(&mut Hole), #[case] expected: &str) {
    let store = SnapshotStore::new();
    let stored = store.ingest_hole(hole(1, "a")).unwrap();

    let mut candidate = hole(1, "b");
    change(&mut candidate);
    match store.ingest_hole(candidate) {
        Err(StoreError::ImmutableFieldViolation { field, id: 1, .. }) => assert_eq!(field, expected),
        other => panic!("expected ImmutableFieldViolation, got {other:?}"),
    }
    assert_eq!(store.latest_hole(HoleId(1)).unwrap(), stored);
}

#[rstest]
#[case::hole(|r: &mut Reply| r.hole = HoleId(2), "hole")]
#[case::name(|r: &mut Reply| r.name = "Bob".to_string(), "name")]
#[case::dz(|r: &mut Reply| r.dz = true, "dz")]
fn immutable_reply_fields(#[case] change: fn(&mut Reply), #[case] expected: &str) {
    let store = SnapshotStore::new();
    store.ingest_hole(hole(1, "a")).unwrap();
    store.ingest_hole(hole(2, "b")).unwrap();
    store.ingest_reply(reply(10, 1, "x")).unwrap();

    let mut candidate = reply(10, 1, "x");
    change(&mut candidate);
    match store.ingest_reply(candidate) {
        Err(StoreError::ImmutableFieldViolation { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected ImmutableFieldViolation, got {other:?}"),
    }
    assert_eq!(store.reply_history(ReplyId(10)).len(), 1);
}

#[test]
fn dangling_reply_succeeds_once_its_hole_arrives() {
    let store = SnapshotStore::new();
    assert!(matches!(
        store.ingest_reply(reply(10, 5, "early")),
        Err(StoreError::DanglingReference { .. })
    ));

    store.ingest_hole(hole(5, "late hole")).unwrap();
    let entry = store.ingest_reply(reply(10, 5, "early")).unwrap();
    assert_eq!(entry.snapshot(), SnapshotMarker::FIRST);
}

#[test]
fn hole_and_reply_ids_are_separate_namespaces() {
    let store = SnapshotStore::new();
    store.ingest_hole(hole(7, "hole seven")).unwrap();
    store.ingest_reply(reply(7, 7, "reply seven")).unwrap();
    store.ingest_reply(reply(7, 7, "reply seven, edited")).unwrap();

    assert_eq!(store.latest_hole(HoleId(7)).unwrap().snapshot().seq(), 0);
    assert_eq!(store.latest_reply(ReplyId(7)).unwrap().snapshot().seq(), 1);
}

#[test]
fn blank_media_url_is_invalid_content_kind() {
    let store = SnapshotStore::new();
    let mut candidate = hole(3, "");
    candidate.kind = HoleKind::Image {
        url: "  ".to_string(),
    };
    let err = store.ingest_hole(candidate).unwrap_err();
    assert!(matches!(err, StoreError::InvalidContentKind { ref kind, .. } if kind == "image"));
    assert_eq!(store.stats().holes, 0);
}

// ---------------------------------------------------------------------------
// Policies and bounds
// ---------------------------------------------------------------------------

#[test]
fn every_observation_versions_identical_candidates() {
    let store = SnapshotStore::with_policy(EveryObservation);
    store.ingest_hole(hole(1, "a")).unwrap();
    let again = store.ingest_hole(hole(1, "a")).unwrap();
    assert_eq!(again.snapshot().seq(), 1);
}

#[test]
fn configured_policy_kind_selects_behavior() {
    let store = SnapshotStore::with_policy(SnapshotPolicyKind::EveryObservation);
    store.ingest_hole(hole(1, "a")).unwrap();
    store.ingest_hole(hole(1, "a")).unwrap();
    assert_eq!(store.hole_history(HoleId(1)).len(), 2);
}

#[test]
fn fields_policy_absorbs_untracked_counter_moves() {
    let store = SnapshotStore::with_policy(SnapshotPolicyKind::Fields(TrackedFields {
        reply: true,
        likenum: false,
    }));
    store.ingest_hole(hole(1, "a")).unwrap();

    let mut liked = hole(1, "a");
    liked.likenum = 40;
    let view = store.ingest_hole(liked).unwrap();
    assert_eq!(view.snapshot(), SnapshotMarker::FIRST);
    assert_eq!(view.entry().likenum, 0, "no-op keeps the stored counters");

    let mut replied = hole(1, "a");
    replied.reply = 2;
    replied.likenum = 41;
    let view = store.ingest_hole(replied).unwrap();
    assert_eq!(view.snapshot().seq(), 1);
    assert_eq!(view.entry().likenum, 41);

    let counters_off = SnapshotStore::with_policy(TrackedContent(TrackedFields::NONE));
    counters_off.ingest_hole(hole(1, "a")).unwrap();
    let mut busy = hole(1, "a");
    busy.reply = 9;
    busy.likenum = 9;
    counters_off.ingest_hole(busy).unwrap();
    assert_eq!(counters_off.hole_history(HoleId(1)).len(), 1);
}

#[test]
fn overloaded_history_rejects_new_versions_but_not_no_ops() {
    let store = SnapshotStore::new().with_limit(2);
    store.ingest_hole(hole(1, "a")).unwrap();
    store.ingest_hole(hole(1, "b")).unwrap();

    let err = store.ingest_hole(hole(1, "c")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Overloaded { entity_type: EntityType::Hole, id: 1, limit: 2 }
    ));
    assert_eq!(store.ingest_hole(hole(1, "b")).unwrap().snapshot().seq(), 1);
    assert!(store.ingest_hole(hole(2, "other id")).is_ok());
}

// ---------------------------------------------------------------------------
// Tombstones
// ---------------------------------------------------------------------------

#[test]
fn redaction_appends_a_tombstone_once() {
    let store = SnapshotStore::new().with_limit(1);
    store.ingest_hole(hole(1, "a")).unwrap();

    let tombstone = store.redact_hole(HoleId(1)).unwrap();
    assert!(tombstone.is_tombstone());
    assert_eq!(tombstone.snapshot().seq(), 1);
    assert_eq!(tombstone.entry().text, "a");

    assert_eq!(store.redact_hole(HoleId(1)).unwrap(), tombstone);
    assert_eq!(store.hole_history(HoleId(1)).len(), 2);

    let json = serde_json::to_value(&tombstone).unwrap();
    assert_eq!(json["tombstone"], true);
    let earlier = serde_json::to_value(store.at(EntityType::Hole, 1, "s0").unwrap()).unwrap();
    assert!(earlier.get("tombstone").is_none());

    assert_eq!(store.ingest_hole(hole(1, "a")).unwrap_err().code(), "redacted");
}
