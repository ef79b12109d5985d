//! Read-side views and ingestion candidates.
//!
//! An [`EntryView`] pairs an entity with the marker of the version it
//! reflects. Views can only be produced from a stored [`Snapshot`], so the
//! content and the marker always come from the same record.
//!
//! [`Snapshot`]: crate::snapshot::Snapshot

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::entities::{Hole, HoleKind, Reply};
use crate::enums::EntityType;
use crate::errors::CoreError;
use crate::snapshot::SnapshotMarker;

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(b: &bool) -> bool {
    !*b
}

/// An entity paired with the snapshot marker naming its version.
///
/// Serializes as `{ "entry": {...}, "snapshot": "s3" }`; `tombstone` is only
/// emitted for redaction records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EntryView<E> {
    entry: E,
    snapshot: SnapshotMarker,
    #[serde(default, skip_serializing_if = "is_false")]
    tombstone: bool,
}

pub type HoleEntry = EntryView<Hole>;
pub type ReplyEntry = EntryView<Reply>;

impl<E> EntryView<E> {
    pub(crate) const fn new(entry: E, snapshot: SnapshotMarker, tombstone: bool) -> Self {
        Self {
            entry,
            snapshot,
            tombstone,
        }
    }

    #[must_use]
    pub const fn entry(&self) -> &E {
        &self.entry
    }

    #[must_use]
    pub const fn snapshot(&self) -> SnapshotMarker {
        self.snapshot
    }

    #[must_use]
    pub const fn is_tombstone(&self) -> bool {
        self.tombstone
    }

    #[must_use]
    pub fn into_entry(self) -> E {
        self.entry
    }

    #[must_use]
    pub fn into_parts(self) -> (E, SnapshotMarker) {
        (self.entry, self.snapshot)
    }
}

/// A view of either entity type, as returned by the untyped ingestion path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnyEntry {
    Hole(HoleEntry),
    Reply(ReplyEntry),
}

impl AnyEntry {
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Hole(_) => EntityType::Hole,
            Self::Reply(_) => EntityType::Reply,
        }
    }

    #[must_use]
    pub const fn snapshot(&self) -> SnapshotMarker {
        match self {
            Self::Hole(view) => view.snapshot(),
            Self::Reply(view) => view.snapshot(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Hole(view) => view.entry().id.into(),
            Self::Reply(view) => view.entry().id.into(),
        }
    }
}

impl From<HoleEntry> for AnyEntry {
    fn from(view: HoleEntry) -> Self {
        Self::Hole(view)
    }
}

impl From<ReplyEntry> for AnyEntry {
    fn from(view: ReplyEntry) -> Self {
        Self::Reply(view)
    }
}

/// Raw ingestion input: entity fields without a snapshot marker.
///
/// Untagged so that a JSON array may mix holes and replies; a hole is
/// recognized by its `kind`/`likenum` fields, a reply by `hole`/`name`/`dz`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum Candidate {
    Hole(Hole),
    Reply(Reply),
}

const HOLE_KEYS: [&str; 2] = ["kind", "likenum"];
const REPLY_KEYS: [&str; 3] = ["hole", "name", "dz"];

impl Candidate {
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Hole(_) => EntityType::Hole,
            Self::Reply(_) => EntityType::Reply,
        }
    }

    /// Which entity a JSON object describes, judged by its keys alone.
    #[must_use]
    pub fn entity_type_of(value: &Value) -> Option<EntityType> {
        let fields = value.as_object()?;
        if HOLE_KEYS.iter().any(|key| fields.contains_key(*key)) {
            Some(EntityType::Hole)
        } else if REPLY_KEYS.iter().any(|key| fields.contains_key(*key)) {
            Some(EntityType::Reply)
        } else {
            None
        }
    }

    /// Decode one candidate object, keeping model errors typed.
    ///
    /// The hole `kind` is decoded on its own first, so a malformed kind
    /// surfaces as `InvalidContentKind` instead of a generic serde message.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidContentKind` for a malformed hole kind and
    /// `CoreError::Validation` for anything else that is not a hole or reply.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match Self::entity_type_of(&value) {
            Some(EntityType::Hole) => {
                if let Some(kind) = value.get("kind") {
                    HoleKind::from_value(kind)?;
                }
                serde_json::from_value(value)
                    .map(Self::Hole)
                    .map_err(|e| CoreError::Validation(format!("invalid hole: {e}")))
            }
            Some(EntityType::Reply) => serde_json::from_value(value)
                .map(Self::Reply)
                .map_err(|e| CoreError::Validation(format!("invalid reply: {e}"))),
            None => Err(CoreError::Validation(
                "candidate is neither a hole nor a reply".to_string(),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Candidate {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Self::from_value(Value::deserialize(d)?).map_err(D::Error::custom)
    }
}

impl From<Hole> for Candidate {
    fn from(hole: Hole) -> Self {
        Self::Hole(hole)
    }
}

impl From<Reply> for Candidate {
    fn from(reply: Reply) -> Self {
        Self::Reply(reply)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::entities::HoleKind;
    use crate::ids::{HoleId, ReplyId};
    use crate::snapshot::Snapshot;

    fn hole() -> Hole {
        Hole {
            id: HoleId(1),
            text: "a".into(),
            kind: HoleKind::Text,
            timestamp: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            reply: 0,
            likenum: 0,
            tag: None,
        }
    }

    fn snapshot_of(hole: Hole, seq: u64, tombstone: bool) -> Snapshot<Hole> {
        Snapshot {
            marker: SnapshotMarker::from_seq(seq),
            entity: hole,
            tombstone,
            recorded_at: DateTime::from_timestamp(1_700_000_100, 0).unwrap(),
        }
    }

    #[test]
    fn view_serializes_as_entry_and_snapshot() {
        let view = snapshot_of(hole(), 3, false).view();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["snapshot"], "s3");
        assert_eq!(json["entry"]["id"], 1);
        assert_eq!(json["entry"]["kind"]["type"], "text");
        assert!(json.get("tombstone").is_none());
    }

    #[test]
    fn tombstone_flag_is_emitted_only_when_set() {
        let view = snapshot_of(hole(), 4, true).view();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["tombstone"], true);
        let back: HoleEntry = serde_json::from_value(json).unwrap();
        assert!(back.is_tombstone());
    }

    #[test]
    fn candidate_untagged_distinguishes_holes_and_replies() {
        let reply = Reply {
            id: ReplyId(10),
            hole: HoleId(1),
            name: "Alice".into(),
            text: "hi".into(),
            dz: true,
            timestamp: DateTime::from_timestamp(1_700_000_050, 0).unwrap(),
            tag: None,
        };
        let input = serde_json::to_string(&vec![
            Candidate::from(hole()),
            Candidate::from(reply.clone()),
        ])
        .unwrap();
        let parsed: Vec<Candidate> = serde_json::from_str(&input).unwrap();
        assert_eq!(parsed[0].entity_type(), EntityType::Hole);
        assert_eq!(parsed[1], Candidate::Reply(reply));
    }

    #[test]
    fn candidate_keeps_kind_error_typed() {
        let mut json = serde_json::to_value(hole()).unwrap();
        json["kind"] = serde_json::json!({"type": "image", "url": ""});
        let err = Candidate::from_value(json).unwrap_err();
        assert!(matches!(err, CoreError::InvalidContentKind { kind, .. } if kind == "image"));
    }

    #[test]
    fn candidate_shape_decides_the_entity() {
        assert_eq!(
            Candidate::entity_type_of(&serde_json::json!({"id": 1, "likenum": 0})),
            Some(EntityType::Hole)
        );
        assert_eq!(
            Candidate::entity_type_of(&serde_json::json!({"id": 1, "dz": true})),
            Some(EntityType::Reply)
        );
        assert_eq!(Candidate::entity_type_of(&serde_json::json!({"id": 1})), None);
        assert!(matches!(
            Candidate::from_value(serde_json::json!([1, 2])),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn any_entry_reports_identity() {
        let any = AnyEntry::from(snapshot_of(hole(), 0, false).view());
        assert_eq!(any.entity_type(), EntityType::Hole);
        assert_eq!(any.id(), 1);
        assert_eq!(any.snapshot(), SnapshotMarker::FIRST);
    }
}
