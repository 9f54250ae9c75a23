//! Core tree traits for hierarchical record collections

use crate::tree::{Record, RecordId};
use log::warn;
use std::collections::{HashSet, VecDeque};

/// A forest of records linked by parent IDs
///
/// Implementations provide point lookup, parent lookup and child fan-out;
/// derived methods build paths, depths and ancestry checks on top of them.
/// Every derived walk up the parent chain stops at the first repeated ID, so
/// a parent cycle never makes it loop.
pub trait Tree {
    /// Get a record by its ID
    ///
    /// Returns `None` if the ID is unknown.
    fn get(&self, id: &RecordId) -> Option<&Record>;

    /// Iterate over the IDs of the direct children of a record
    ///
    /// Returns an empty iterator for leaves or unknown IDs.
    fn child_ids<'a>(&'a self, id: &RecordId) -> Box<dyn Iterator<Item = &'a RecordId> + 'a>;

    /// Iterate over the IDs of records that have no parent in the tree
    ///
    /// This covers true roots and records whose parent is an orphan reference.
    fn top_level_ids(&self) -> Box<dyn Iterator<Item = &RecordId> + '_>;

    /// Count records in the tree
    fn record_count(&self) -> usize;

    /// Check if a record exists
    fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    /// Get the ID of a record's parent, if that parent is in the tree
    fn parent_id(&self, id: &RecordId) -> Option<&RecordId> {
        let parent = self.get(id)?.parent.as_ref()?;
        self.get(parent).map(|record| &record.id)
    }

    /// Check if a record is a root (has no parent at all)
    ///
    /// Returns false for unknown IDs.
    fn is_root(&self, id: &RecordId) -> bool {
        self.get(id).map(Record::is_root).unwrap_or(false)
    }

    /// Count children of a record
    fn child_count(&self, id: &RecordId) -> usize {
        self.child_ids(id).count()
    }

    /// Get the chain of IDs from a record up to its topmost reachable ancestor
    ///
    /// The record itself comes first. Returns an empty vector for unknown IDs.
    fn path_ids(&self, id: &RecordId) -> Vec<&RecordId> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.get(id).map(|record| &record.id);

        while let Some(record_id) = current {
            if !seen.insert(record_id) {
                warn!("Parent cycle through {}, stopping ancestor walk", record_id);
                break;
            }
            path.push(record_id);
            current = self.parent_id(record_id);
        }

        path
    }

    /// Get the depth of a record (top level = 0)
    ///
    /// Returns 0 for unknown IDs.
    fn depth(&self, id: &RecordId) -> usize {
        self.path_ids(id).len().saturating_sub(1)
    }

    /// Check if `ancestor` is a strict ancestor of `descendant`
    fn is_ancestor_of(&self, ancestor: &RecordId, descendant: &RecordId) -> bool {
        self.path_ids(descendant)
            .into_iter()
            .skip(1)
            .any(|id| id == ancestor)
    }
}

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children, siblings in insertion order
    PreOrder,
    /// Visit level by level
    BreadthFirst,
}

/// Extension trait providing walks and searches
///
/// This trait is automatically implemented for all types that implement `Tree`.
pub trait TreeTraversal: Tree {
    /// Walk every top-level record and its subtree in the given order
    fn walk(&self, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        TreeWalker::new(self, self.top_level_ids().collect(), order)
    }

    /// Walk the subtree of a single record, including the record itself
    fn walk_from(&self, start: &RecordId, order: TraversalOrder) -> TreeWalker<'_, Self>
    where
        Self: Sized,
    {
        let start = self.get(start).map(|record| &record.id);
        TreeWalker::new(self, start.into_iter().collect(), order)
    }

    /// Find records matching a predicate, in pre-order
    fn find<F>(&self, predicate: F) -> Vec<&Record>
    where
        F: Fn(&Record) -> bool,
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter_map(|id| self.get(id))
            .filter(|record| predicate(record))
            .collect()
    }

    /// Find the first record with the given label, in pre-order
    fn find_by_label(&self, label: &str) -> Option<&Record>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter_map(|id| self.get(id))
            .find(|record| record.label() == Some(label))
    }

    /// Get the IDs of all records without children
    fn leaves(&self) -> Vec<&RecordId>
    where
        Self: Sized,
    {
        self.walk(TraversalOrder::PreOrder)
            .filter(|id| self.child_count(id) == 0)
            .collect()
    }
}

// Blanket implementation for all Tree types
impl<T: Tree> TreeTraversal for T {}

/// Iterator for traversing a tree in different orders
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    order: TraversalOrder,
    frontier: VecDeque<&'a RecordId>,
    visited: HashSet<&'a RecordId>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    /// Create a new walker over the subtrees of the given starting records
    pub fn new(tree: &'a T, starts: Vec<&'a RecordId>, order: TraversalOrder) -> Self {
        let mut frontier: VecDeque<_> = starts.into();

        // Pre-order pops from the back
        if order == TraversalOrder::PreOrder {
            frontier.make_contiguous().reverse();
        }

        Self {
            tree,
            order,
            frontier,
            visited: HashSet::new(),
        }
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = &'a RecordId;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = match self.order {
                TraversalOrder::PreOrder => self.frontier.pop_back()?,
                TraversalOrder::BreadthFirst => self.frontier.pop_front()?,
            };

            if !self.visited.insert(current) {
                continue;
            }

            let children = self.tree.child_ids(current);
            match self.order {
                TraversalOrder::PreOrder => {
                    let children: Vec<_> = children.collect();
                    self.frontier.extend(children.into_iter().rev());
                }
                TraversalOrder::BreadthFirst => self.frontier.extend(children),
            }

            return Some(current);
        }
    }
}
