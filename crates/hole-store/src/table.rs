//! Per-type snapshot tables.
//!
//! Each id owns a row: an `RwLock` around an `Arc` of its snapshot list.
//! Writers to one id serialize on that row's lock while other ids proceed in
//! parallel. Readers clone the `Arc` under the read lock and then iterate
//! without holding any lock, so they see the list either before or after a
//! concurrent append, never in between.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use hole_core::entities::Entity;
use hole_core::entry::EntryView;
use hole_core::snapshot::{Snapshot, SnapshotMarker};

use crate::history::SnapshotHistory;

pub(crate) type SnapshotList<E> = Arc<Vec<Arc<Snapshot<E>>>>;

/// One id's history, as seen by a writer holding the row lock.
pub(crate) struct Versions<E> {
    list: SnapshotList<E>,
    /// Set when the row was dropped from the map while still empty.
    retired: bool,
}

impl<E> Default for Versions<E> {
    fn default() -> Self {
        Self {
            list: Arc::new(Vec::new()),
            retired: false,
        }
    }
}

impl<E> Versions<E> {
    pub(crate) fn latest(&self) -> Option<&Snapshot<E>> {
        self.list.last().map(AsRef::as_ref)
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Marker the next appended snapshot receives.
    pub(crate) fn next_marker(&self) -> SnapshotMarker {
        SnapshotMarker::from_seq(self.list.len() as u64)
    }

    /// Append and return the stored snapshot. Copies the list only if a
    /// reader still holds the previous one.
    pub(crate) fn push(&mut self, snapshot: Snapshot<E>) -> Arc<Snapshot<E>> {
        let snapshot = Arc::new(snapshot);
        Arc::make_mut(&mut self.list).push(Arc::clone(&snapshot));
        snapshot
    }
}

type Row<E> = Arc<RwLock<Versions<E>>>;

pub(crate) struct EntityTable<E: Entity> {
    rows: DashMap<E::Id, Row<E>>,
}

impl<E: Entity> Default for EntityTable<E> {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
        }
    }
}

impl<E: Entity> EntityTable<E> {
    // The map guard is dropped before the row lock is taken.
    fn row(&self, id: E::Id) -> Option<Row<E>> {
        self.rows.get(&id).map(|row| Arc::clone(row.value()))
    }

    fn row_or_insert(&self, id: E::Id) -> Row<E> {
        Arc::clone(self.rows.entry(id).or_default().value())
    }

    /// Snapshot list of `id`, `None` if the id has no stored snapshot.
    pub(crate) fn snapshots(&self, id: E::Id) -> Option<SnapshotList<E>> {
        let row = self.row(id)?;
        let versions = row.read().unwrap_or_else(PoisonError::into_inner);
        (!versions.is_empty()).then(|| Arc::clone(&versions.list))
    }

    pub(crate) fn contains(&self, id: E::Id) -> bool {
        self.snapshots(id).is_some()
    }

    pub(crate) fn latest(&self, id: E::Id) -> Option<EntryView<E>> {
        self.snapshots(id)?.last().map(|snapshot| snapshot.view())
    }

    pub(crate) fn at(&self, id: E::Id, marker: SnapshotMarker) -> Option<EntryView<E>> {
        let index = usize::try_from(marker.seq()).ok()?;
        self.snapshots(id)?.get(index).map(|snapshot| snapshot.view())
    }

    pub(crate) fn history(&self, id: E::Id) -> SnapshotHistory<E> {
        self.snapshots(id)
            .map_or_else(SnapshotHistory::empty, SnapshotHistory::new)
    }

    /// Run `f` under the write lock of `id`, creating the row if needed.
    ///
    /// A row still empty after `f` is removed from the map before its lock is
    /// released, so a rejected first write leaves nothing behind. Writers
    /// already queued on that row find it retired and start over.
    pub(crate) fn update_or_insert<T, F>(&self, id: E::Id, f: F) -> T
    where
        F: FnOnce(&mut Versions<E>) -> T,
    {
        loop {
            let row = self.row_or_insert(id);
            let mut versions = row.write().unwrap_or_else(PoisonError::into_inner);
            if versions.retired {
                continue;
            }

            let out = f(&mut versions);
            if versions.is_empty() {
                versions.retired = true;
                self.rows.remove_if(&id, |_, mapped| Arc::ptr_eq(mapped, &row));
            }
            return out;
        }
    }

    /// Run `f` under the write lock of an existing `id`; `None` if the id is
    /// unknown.
    pub(crate) fn update<T, F>(&self, id: E::Id, f: F) -> Option<T>
    where
        F: FnOnce(&mut Versions<E>) -> T,
    {
        let row = self.row(id)?;
        let mut versions = row.write().unwrap_or_else(PoisonError::into_inner);
        if versions.is_empty() {
            return None;
        }
        Some(f(&mut versions))
    }

    /// Latest views of every id whose latest entity matches `keep`.
    pub(crate) fn latest_matching<F>(&self, keep: F) -> Vec<EntryView<E>>
    where
        F: Fn(&E) -> bool,
    {
        let rows: Vec<Row<E>> = self.rows.iter().map(|row| Arc::clone(row.value())).collect();
        rows.iter()
            .filter_map(|row| {
                let versions = row.read().unwrap_or_else(PoisonError::into_inner);
                versions
                    .latest()
                    .filter(|snapshot| keep(&snapshot.entity))
                    .map(Snapshot::view)
            })
            .collect()
    }

    /// `(ids with at least one snapshot, total snapshots)`.
    pub(crate) fn counts(&self) -> (u64, u64) {
        let rows: Vec<Row<E>> = self.rows.iter().map(|row| Arc::clone(row.value())).collect();
        rows.iter().fold((0, 0), |(ids, snapshots), row| {
            let len = row.read().unwrap_or_else(PoisonError::into_inner).len() as u64;
            if len == 0 {
                (ids, snapshots)
            } else {
                (ids + 1, snapshots + len)
            }
        })
    }
}
