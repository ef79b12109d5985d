//! Service layer owning the snapshot tables, the policy, and the trail.
//!
//! `SnapshotStore` holds one table per entity type. Per-type operations are
//! implemented as `impl SnapshotStore` blocks under `repos/`; this module
//! keeps construction and the generic ingest/redact/restore paths they share.

use chrono::{DateTime, Utc};
use hole_config::HoleConfig;
use hole_core::entities::{Entity, Hole, Reply};
use hole_core::entry::EntryView;
use hole_core::enums::{SnapshotPolicyKind, TrailOp};
use hole_core::snapshot::Snapshot;
use hole_core::trail::SnapshotRecord;

use crate::error::StoreError;
use crate::policy::SnapshotPolicy;
use crate::table::EntityTable;
use crate::trail::writer::{TrailWriter, snapshot_record};

/// Default cap on one entity's history when built without config.
pub const DEFAULT_MAX_SNAPSHOTS_PER_ENTITY: usize = 1024;

/// Append-only versioned store of holes and replies.
///
/// Every ingestion follows this protocol under the id's write lock:
/// 1. Reject if the history ends in a tombstone
/// 2. Reject immutable field changes
/// 3. Ask the policy whether the candidate is a new version
/// 4. Enforce the history bound
/// 5. Append the trail record, then publish the snapshot
pub struct SnapshotStore<P: SnapshotPolicy = SnapshotPolicyKind> {
    pub(crate) holes: EntityTable<Hole>,
    pub(crate) replies: EntityTable<Reply>,
    policy: P,
    max_snapshots_per_entity: usize,
    trail: TrailWriter,
}

impl SnapshotStore {
    /// In-memory store with the default policy and no trail.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(SnapshotPolicyKind::default())
    }

    /// Build a store from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Trail` if the trail is enabled and its directory
    /// cannot be created.
    pub fn from_config(config: &HoleConfig) -> Result<Self, StoreError> {
        let trail = match config.trail.active_dir() {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self::with_policy(config.store.policy)
            .with_limit(config.store.max_snapshots_per_entity)
            .with_trail(trail))
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SnapshotPolicy> SnapshotStore<P> {
    #[must_use]
    pub fn with_policy(policy: P) -> Self {
        Self {
            holes: EntityTable::default(),
            replies: EntityTable::default(),
            policy,
            max_snapshots_per_entity: DEFAULT_MAX_SNAPSHOTS_PER_ENTITY,
            trail: TrailWriter::disabled(),
        }
    }

    #[must_use]
    pub const fn with_limit(mut self, max_snapshots_per_entity: usize) -> Self {
        self.max_snapshots_per_entity = max_snapshots_per_entity;
        self
    }

    #[must_use]
    pub fn with_trail(mut self, trail: TrailWriter) -> Self {
        self.trail = trail;
        self
    }

    #[must_use]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    #[must_use]
    pub const fn max_snapshots_per_entity(&self) -> usize {
        self.max_snapshots_per_entity
    }

    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// `recorded_at` stamps the snapshot if the candidate becomes a new
    /// version; a no-op keeps the stamp of the version it matched.
    pub(crate) fn ingest_into<E: Entity>(
        &self,
        table: &EntityTable<E>,
        candidate: E,
        recorded_at: DateTime<Utc>,
    ) -> Result<EntryView<E>, StoreError> {
        candidate.validate()?;
        let id = candidate.id();

        table.update_or_insert(id, |versions| {
            if let Some(latest) = versions.latest() {
                if latest.tombstone {
                    tracing::warn!("rejected update of redacted {} {id}", E::ENTITY_TYPE);
                    return Err(StoreError::Redacted {
                        entity_type: E::ENTITY_TYPE,
                        id: id.into(),
                    });
                }
                if let Some(field) = candidate.immutable_conflict(&latest.entity) {
                    tracing::warn!(
                        "rejected change of immutable '{field}' on {} {id}",
                        E::ENTITY_TYPE
                    );
                    return Err(StoreError::ImmutableFieldViolation {
                        entity_type: E::ENTITY_TYPE,
                        id: id.into(),
                        field,
                    });
                }
                if !self.policy.is_new_version(&latest.entity, &candidate) {
                    tracing::debug!(
                        "{} {id} unchanged under {}, keeping {}",
                        E::ENTITY_TYPE,
                        self.policy.name(),
                        latest.marker
                    );
                    return Ok(latest.view());
                }
            }

            if versions.len() >= self.max_snapshots_per_entity {
                tracing::warn!(
                    "{} {id} reached {} snapshots",
                    E::ENTITY_TYPE,
                    self.max_snapshots_per_entity
                );
                return Err(StoreError::Overloaded {
                    entity_type: E::ENTITY_TYPE,
                    id: id.into(),
                    limit: self.max_snapshots_per_entity,
                });
            }

            let snapshot = Snapshot {
                marker: versions.next_marker(),
                entity: candidate,
                tombstone: false,
                recorded_at,
            };
            self.trail.append(&snapshot_record(&snapshot)?)?;
            tracing::debug!("{} {id} -> {}", E::ENTITY_TYPE, snapshot.marker);
            Ok(versions.push(snapshot).view())
        })
    }

    pub(crate) fn redact_in<E: Entity>(
        &self,
        table: &EntityTable<E>,
        id: E::Id,
    ) -> Result<EntryView<E>, StoreError> {
        table
            .update(id, |versions| {
                let Some(latest) = versions.latest() else {
                    return Err(not_found::<E>(id));
                };
                if latest.tombstone {
                    return Ok(latest.view());
                }

                let snapshot = Snapshot {
                    marker: versions.next_marker(),
                    entity: latest.entity.clone(),
                    tombstone: true,
                    recorded_at: Utc::now(),
                };
                self.trail.append(&snapshot_record(&snapshot)?)?;
                tracing::debug!("{} {id} redacted at {}", E::ENTITY_TYPE, snapshot.marker);
                Ok(versions.push(snapshot).view())
            })
            .unwrap_or_else(|| Err(not_found::<E>(id)))
    }

    /// Re-insert one trail record, bypassing the policy, the history bound,
    /// and the trail writer. Returns whether the record created its entity.
    pub(crate) fn restore_into<E: Entity>(
        &self,
        table: &EntityTable<E>,
        record: &SnapshotRecord,
    ) -> Result<bool, StoreError> {
        let entity: E = serde_json::from_value(record.data.clone()).map_err(|e| {
            StoreError::Trail(format!(
                "{} {} {}: invalid data: {e}",
                record.entity, record.id, record.snapshot
            ))
        })?;
        entity.validate()?;

        let id = entity.id();
        if Into::<u64>::into(id) != record.id {
            return Err(StoreError::Trail(format!(
                "{} record {} carries data for id {id}",
                record.entity, record.id
            )));
        }
        let recorded_at = DateTime::parse_from_rfc3339(&record.ts)
            .map_err(|e| StoreError::Trail(format!("bad ts '{}': {e}", record.ts)))?
            .with_timezone(&Utc);
        let tombstone = match record.op {
            TrailOp::Snapshot => false,
            TrailOp::Tombstone => true,
        };

        table.update_or_insert(id, |versions| {
            let expected = versions.next_marker();
            if record.snapshot != expected {
                return Err(StoreError::Trail(format!(
                    "{} {id}: found {} where {expected} was expected",
                    record.entity, record.snapshot
                )));
            }
            if versions.latest().is_some_and(|latest| latest.tombstone) {
                return Err(StoreError::Trail(format!(
                    "{} {id}: record {} follows a tombstone",
                    record.entity, record.snapshot
                )));
            }
            if tombstone && versions.is_empty() {
                return Err(StoreError::Trail(format!(
                    "{} {id}: history starts with a tombstone",
                    record.entity
                )));
            }

            versions.push(Snapshot {
                marker: record.snapshot,
                entity,
                tombstone,
                recorded_at,
            });
            Ok(versions.len() == 1)
        })
    }
}

pub(crate) fn not_found<E: Entity>(id: E::Id) -> StoreError {
    StoreError::NotFound {
        entity_type: E::ENTITY_TYPE,
        id: id.into(),
    }
}
