//! Lazy, restartable snapshot histories.

use std::slice;
use std::sync::Arc;

use hole_core::entities::{Entity, Hole, Reply};
use hole_core::entry::{AnyEntry, EntryView};
use hole_core::enums::EntityType;
use hole_core::snapshot::Snapshot;

use crate::table::SnapshotList;

/// Every stored version of one entity, oldest first.
///
/// Holds the snapshot list as it was when the history was taken; later
/// appends are not visible through it. Iterating builds views on demand and
/// can be repeated any number of times.
#[derive(Debug, Clone)]
pub struct SnapshotHistory<E> {
    snapshots: SnapshotList<E>,
}

impl<E: Entity> SnapshotHistory<E> {
    pub(crate) const fn new(snapshots: SnapshotList<E>) -> Self {
        Self { snapshots }
    }

    /// History of an id the store has never seen.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            snapshots: Arc::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn iter(&self) -> HistoryIter<'_, E> {
        HistoryIter {
            inner: self.snapshots.iter(),
        }
    }
}

impl<'a, E: Entity> IntoIterator for &'a SnapshotHistory<E> {
    type Item = EntryView<E>;
    type IntoIter = HistoryIter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct HistoryIter<'a, E> {
    inner: slice::Iter<'a, Arc<Snapshot<E>>>,
}

impl<E: Entity> Iterator for HistoryIter<'_, E> {
    type Item = EntryView<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|snapshot| snapshot.view())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E: Entity> DoubleEndedIterator for HistoryIter<'_, E> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|snapshot| snapshot.view())
    }
}

impl<E: Entity> ExactSizeIterator for HistoryIter<'_, E> {}

/// History returned by the untyped query path.
#[derive(Debug, Clone)]
pub enum AnyHistory {
    Hole(SnapshotHistory<Hole>),
    Reply(SnapshotHistory<Reply>),
}

impl AnyHistory {
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        match self {
            Self::Hole(_) => EntityType::Hole,
            Self::Reply(_) => EntityType::Reply,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Hole(history) => history.len(),
            Self::Reply(history) => history.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Views oldest first.
    #[must_use]
    pub fn entries(&self) -> Box<dyn DoubleEndedIterator<Item = AnyEntry> + '_> {
        match self {
            Self::Hole(history) => Box::new(history.iter().map(AnyEntry::from)),
            Self::Reply(history) => Box::new(history.iter().map(AnyEntry::from)),
        }
    }
}

impl From<SnapshotHistory<Hole>> for AnyHistory {
    fn from(history: SnapshotHistory<Hole>) -> Self {
        Self::Hole(history)
    }
}

impl From<SnapshotHistory<Reply>> for AnyHistory {
    fn from(history: SnapshotHistory<Reply>) -> Self {
        Self::Reply(history)
    }
}
