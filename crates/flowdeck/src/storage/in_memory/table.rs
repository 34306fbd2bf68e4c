//! Insertion-ordered entity tables.
//!
//! Rows live in a `BTreeMap` keyed by an insertion sequence number, with a
//! `HashMap` index from entity id to sequence. Iteration therefore follows
//! insertion order, which is what stable sorts use to break ties.

use crate::domain::{
    AiTrackingEvent, Comment, CommentId, ContextSnapshot, Cycle, CycleId, EntityKind, EventId,
    Issue, IssueId, IssueLabel, LabelId, Project, ProjectId, SnapshotId,
};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::Hash;

/// A stored entity with a typed primary key.
pub(crate) trait Entity: Clone {
    type Id: Copy + Eq + Hash + Display;

    const KIND: EntityKind;

    fn id(&self) -> Self::Id;
}

macro_rules! impl_entity {
    ($ty:ty, $id:ty, $kind:expr) => {
        impl Entity for $ty {
            type Id = $id;

            const KIND: EntityKind = $kind;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

impl_entity!(Project, ProjectId, EntityKind::Project);
impl_entity!(IssueLabel, LabelId, EntityKind::Label);
impl_entity!(Issue, IssueId, EntityKind::Issue);
impl_entity!(Comment, CommentId, EntityKind::Comment);
impl_entity!(Cycle, CycleId, EntityKind::Cycle);
impl_entity!(AiTrackingEvent, EventId, EntityKind::AiEvent);
impl_entity!(ContextSnapshot, SnapshotId, EntityKind::ContextSnapshot);

pub(crate) struct Table<T: Entity> {
    rows: BTreeMap<u64, T>,
    index: HashMap<T::Id, u64>,
    next_seq: u64,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T: Entity> Table<T> {
    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn get(&self, id: &T::Id) -> Option<&T> {
        self.index.get(id).and_then(|seq| self.rows.get(seq))
    }

    pub(crate) fn get_mut(&mut self, id: &T::Id) -> Option<&mut T> {
        self.index.get(id).and_then(|seq| self.rows.get_mut(seq))
    }

    /// Look up `id` or fail with `NotFound`.
    pub(crate) fn require(&self, id: &T::Id) -> Result<&T> {
        self.get(id).ok_or_else(|| Error::not_found(T::KIND, id))
    }

    pub(crate) fn require_mut(&mut self, id: &T::Id) -> Result<&mut T> {
        self.get_mut(id).ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Append a row. Fails with `DuplicateKey` if the id is taken.
    pub(crate) fn insert(&mut self, row: T) -> Result<()> {
        let id = row.id();
        if self.index.contains_key(&id) {
            return Err(Error::duplicate(T::KIND, id));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(id, seq);
        self.rows.insert(seq, row);
        Ok(())
    }

    /// Replace an existing row in place, keeping its position.
    pub(crate) fn update(&mut self, row: T) -> Result<()> {
        let slot = self.require_mut(&row.id())?;
        *slot = row;
        Ok(())
    }

    pub(crate) fn remove(&mut self, id: &T::Id) -> Option<T> {
        let seq = self.index.remove(id)?;
        self.rows.remove(&seq)
    }

    /// Rows in insertion order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    /// Rows matching `predicate`, in insertion order.
    pub(crate) fn fetch<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.iter().filter(|row| predicate(row)).cloned().collect()
    }

    /// Rows matching `predicate`, stably sorted by `compare`.
    pub(crate) fn fetch_sorted<P, S>(&self, predicate: P, compare: S) -> Vec<T>
    where
        P: Fn(&T) -> bool,
        S: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let mut rows = self.fetch(predicate);
        rows.sort_by(compare);
        rows
    }

    pub(crate) fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Build a table from rows, rejecting duplicate ids.
    pub(crate) fn from_rows(rows: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut table = Self::default();
        for row in rows {
            table.insert(row)?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewProject;
    use chrono::Utc;

    fn project(name: &str) -> Project {
        NewProject::named(name).build(Utc::now()).unwrap()
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut table = Table::default();
        for name in ["c", "a", "b"] {
            table.insert(project(name)).unwrap();
        }
        let names: Vec<_> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn duplicate_insert_rejected() {
        let mut table = Table::default();
        let p = project("dup");
        table.insert(p.clone()).unwrap();

        let err = table.insert(p).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateKey {
                kind: EntityKind::Project,
                ..
            }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn update_keeps_position() {
        let mut table = Table::default();
        let first = project("first");
        table.insert(first.clone()).unwrap();
        table.insert(project("second")).unwrap();

        let mut renamed = first;
        renamed.name = "renamed".into();
        table.update(renamed).unwrap();

        let names: Vec<_> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["renamed", "second"]);
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut table: Table<Project> = Table::default();
        let err = table.update(project("ghost")).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn fetch_filters_and_sorts_stably() {
        let mut table = Table::default();
        for name in ["b1", "a", "b2", "c"] {
            table.insert(project(name)).unwrap();
        }
        let rows = table.fetch_sorted(
            |p: &Project| p.name != "c",
            |x: &Project, y: &Project| x.name[..1].cmp(&y.name[..1]),
        );
        let names: Vec<_> = rows.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b1", "b2"]);
    }

    #[test]
    fn remove_then_reinsert_goes_last() {
        let mut table = Table::default();
        let a = project("a");
        table.insert(a.clone()).unwrap();
        table.insert(project("b")).unwrap();

        let removed = table.remove(&a.id).unwrap();
        table.insert(removed).unwrap();
        let names: Vec<_> = table.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
