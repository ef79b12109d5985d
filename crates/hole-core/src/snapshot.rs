//! Snapshot markers and stored snapshot records.
//!
//! A marker names one historical version of one entity. It renders as
//! `s<N>` where `N` is the per-entity sequence number, but callers should
//! treat it as opaque and compare markers with `Ord`, never as strings.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

use crate::entry::EntryView;
use crate::errors::CoreError;

/// Opaque, per-entity ordered version marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotMarker(u64);

impl SnapshotMarker {
    /// Marker of an entity's first snapshot.
    pub const FIRST: Self = Self(0);

    #[must_use]
    pub const fn from_seq(seq: u64) -> Self {
        Self(seq)
    }

    /// Zero-based position of this snapshot in its entity's history.
    #[must_use]
    pub const fn seq(self) -> u64 {
        self.0
    }

    /// The marker that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SnapshotMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl FromStr for SnapshotMarker {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('s')
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok())
            .map(Self)
            .ok_or_else(|| CoreError::InvalidMarker(s.to_string()))
    }
}

impl Serialize for SnapshotMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SnapshotMarker {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(D::Error::custom)
    }
}

impl JsonSchema for SnapshotMarker {
    fn schema_name() -> Cow<'static, str> {
        "SnapshotMarker".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^s[0-9]+$"
        })
    }
}

/// One immutable version of an entity as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<E> {
    pub marker: SnapshotMarker,
    pub entity: E,
    /// Set on the redaction record that closes an entity's history.
    pub tombstone: bool,
    /// When the store accepted this version. Descriptive only; ordering
    /// comes from `marker`.
    pub recorded_at: DateTime<Utc>,
}

impl<E: Clone> Snapshot<E> {
    /// The read-side view of exactly this version.
    #[must_use]
    pub fn view(&self) -> EntryView<E> {
        EntryView::new(self.entity.clone(), self.marker, self.tombstone)
    }
}
