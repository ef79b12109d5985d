//! Entity types, trail operations, and snapshot policy selectors.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// The two versioned content types. Hole ids and reply ids are independent
/// namespaces, so every lookup carries one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Hole,
    Reply,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hole => "hole",
            Self::Reply => "reply",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hole" => Ok(Self::Hole),
            "reply" => Ok(Self::Reply),
            other => Err(CoreError::Validation(format!(
                "unknown entity type '{other}' (expected 'hole' or 'reply')"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Operation type recorded in the JSONL snapshot trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    /// A new content version was appended.
    Snapshot,
    /// The entity was redacted; the record repeats the last content.
    Tombstone,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Tombstone => "tombstone",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SnapshotPolicyKind
// ---------------------------------------------------------------------------

/// Which rule decides that an ingested update is a new version.
///
/// ```text
/// content_changed    new snapshot iff a mutable field differs (default)
/// every_observation  new snapshot on every ingestion of a known id
/// fields             like content_changed, but hole counters only count
///                    when tracked
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicyKind {
    #[default]
    ContentChanged,
    EveryObservation,
    Fields(TrackedFields),
}

impl SnapshotPolicyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentChanged => "content_changed",
            Self::EveryObservation => "every_observation",
            Self::Fields(_) => "fields",
        }
    }
}

// ---------------------------------------------------------------------------
// TrackedFields
// ---------------------------------------------------------------------------

/// Hole counters that count toward a new version. Text and tag always do;
/// an untracked counter that moves on its own is absorbed as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TrackedFields {
    pub reply: bool,
    pub likenum: bool,
}

impl TrackedFields {
    pub const ALL: Self = Self {
        reply: true,
        likenum: true,
    };

    pub const NONE: Self = Self {
        reply: false,
        likenum: false,
    };
}

impl Default for TrackedFields {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for SnapshotPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
