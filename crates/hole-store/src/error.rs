//! Store error types for hole-store.

use hole_core::enums::EntityType;
use hole_core::errors::CoreError;
use hole_core::ids::{HoleId, ReplyId};
use thiserror::Error;

/// Errors from ingestion, queries, and trail replay.
///
/// Every rejection is reported through this type; the store never panics on
/// bad input and never drops an update that is not a true no-op.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A hole kind carries a malformed payload.
    #[error("Invalid content kind '{kind}': {reason}")]
    InvalidContentKind { kind: String, reason: String },

    /// An update tried to change a field fixed at creation.
    #[error("Immutable field '{field}' of {entity_type} {id} cannot change")]
    ImmutableFieldViolation {
        entity_type: EntityType,
        id: u64,
        field: &'static str,
    },

    /// A reply references a hole the store has never seen.
    #[error("Reply {reply} references unknown hole {hole}")]
    DanglingReference { reply: ReplyId, hole: HoleId },

    /// Lookup of the latest version for an unknown id.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: EntityType, id: u64 },

    /// Lookup of a marker that never existed for the id.
    #[error("Unknown snapshot '{snapshot}' for {entity_type} {id}")]
    UnknownSnapshot {
        entity_type: EntityType,
        id: u64,
        snapshot: String,
    },

    /// The id's history is at its configured bound.
    #[error("{entity_type} {id} is overloaded: history reached {limit} snapshots")]
    Overloaded {
        entity_type: EntityType,
        id: u64,
        limit: usize,
    },

    /// The entity's history ends in a tombstone and accepts no further updates.
    #[error("{entity_type} {id} has been redacted")]
    Redacted { entity_type: EntityType, id: u64 },

    /// Input failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Writing or replaying the JSONL trail failed.
    #[error("Trail error: {0}")]
    Trail(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Stable snake_case discriminant, used as the `code` of error responses.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidContentKind { .. } => "invalid_content_kind",
            Self::ImmutableFieldViolation { .. } => "immutable_field_violation",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::NotFound { .. } => "not_found",
            Self::UnknownSnapshot { .. } => "unknown_snapshot",
            Self::Overloaded { .. } => "overloaded",
            Self::Redacted { .. } => "redacted",
            Self::Validation(_) => "validation",
            Self::Trail(_) => "trail",
            Self::Other(_) => "other",
        }
    }
}

impl From<CoreError> for StoreError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidContentKind { kind, reason } => {
                Self::InvalidContentKind { kind, reason }
            }
            CoreError::InvalidMarker(marker) => {
                Self::Validation(format!("invalid snapshot marker '{marker}'"))
            }
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}
