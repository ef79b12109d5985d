//! Entity structs for the two versioned content types.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation. The [`Entity`] trait is the seam the
//! snapshot store is generic over.

mod hole;
mod reply;

pub use hole::{Hole, HoleKind};
pub use reply::Reply;

use std::fmt;
use std::hash::Hash;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::enums::{EntityType, TrackedFields};
use crate::errors::CoreError;

/// A versioned entity: a stable identity, immutable fields fixed at creation,
/// and mutable fields whose changes produce new snapshots.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identity type, unique within this entity's namespace.
    type Id: Copy + Eq + Ord + Hash + fmt::Display + fmt::Debug + Into<u64> + Send + Sync + 'static;

    const ENTITY_TYPE: EntityType;

    fn id(&self) -> Self::Id;

    /// Check the value is well formed before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns `CoreError` if a field violates a model constraint.
    fn validate(&self) -> Result<(), CoreError>;

    /// Name of the first immutable field on which `self` differs from
    /// `stored`, or `None` if all immutable fields agree.
    fn immutable_conflict(&self, stored: &Self) -> Option<&'static str>;

    /// Whether every mutable field equals the one in `other`.
    fn same_content(&self, other: &Self) -> bool;

    /// Like [`Self::same_content`], but counters left out of `tracked` are
    /// not compared. Entities without counters compare all content.
    fn same_tracked_content(&self, other: &Self, _tracked: TrackedFields) -> bool {
        self.same_content(other)
    }
}
