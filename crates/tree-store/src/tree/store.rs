//! Indexed record store with parent/child lookup tables

use crate::error::{Result, StoreError};
use crate::options::{CyclePolicy, StoreOptions};
use crate::tree::{Record, RecordId, RecordPatch, Tree};
use log::{debug, trace, warn};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Positions of the direct children of one parent, in sequence order
type ChildList = SmallVec<[usize; 4]>;

/// An in-memory forest of records with O(1) lookup by ID and by parent
///
/// The store keeps three views of the same data in sync:
///
/// - the ordered list of records, in insertion order
/// - an index from ID to position in that list
/// - an index from parent ID to the positions of its direct children
///
/// No node graph is built; ancestors and descendants are derived by walking
/// the two indexes. Both indexes are rebuilt from the list whenever
/// positions shift (removal) or a record moves to another parent.
///
/// # Example
///
/// ```
/// use tree_store::prelude::*;
///
/// let mut store = TreeStore::new(vec![
///     Record::new(1).with_label("Documents"),
///     Record::new(2).with_parent(1).with_label("Work"),
/// ])?;
///
/// store.add_item(Record::new(3).with_parent(2).with_label("Reports"))?;
///
/// let path: Vec<_> = store.ancestors(&3.into()).iter().map(|r| r.id.clone()).collect();
/// assert_eq!(path, vec![RecordId::Int(3), RecordId::Int(2), RecordId::Int(1)]);
/// # Ok::<(), StoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    /// All records in insertion order
    records: Vec<Record>,
    /// ID -> position in `records`
    by_id: HashMap<RecordId, usize>,
    /// Parent ID -> positions of its children in `records`
    children: HashMap<RecordId, ChildList>,
    options: StoreOptions,
}

impl TreeStore {
    /// Build a store from a sequence of records using default options
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two records share an ID.
    pub fn new(records: impl IntoIterator<Item = Record>) -> Result<Self> {
        Self::with_options(records, StoreOptions::default())
    }

    /// Build a store from a sequence of records
    ///
    /// Records are indexed in the order given; children lists keep that
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two records share an ID, or
    /// [`StoreError::Cycle`] if the options reject cycles and the records
    /// contain one.
    pub fn with_options(
        records: impl IntoIterator<Item = Record>,
        options: StoreOptions,
    ) -> Result<Self> {
        let mut store = Self {
            records: Vec::with_capacity(options.initial_capacity),
            by_id: HashMap::with_capacity(options.initial_capacity),
            children: HashMap::new(),
            options,
        };

        for record in records {
            store.add_item(record)?;
        }

        debug!("Built tree store with {} records", store.records.len());
        Ok(store)
    }

    /// The options this store was built with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// All records in insertion order
    pub fn all(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over all records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by ID
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.by_id.get(id).map(|&pos| &self.records[pos])
    }

    /// Check if a record with this ID exists
    pub fn contains(&self, id: &RecordId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Direct children of a record, in insertion order
    ///
    /// Returns an empty vector for leaves and unknown IDs. Records whose
    /// parent is `id` are returned even if `id` itself is not in the store.
    pub fn children(&self, id: &RecordId) -> Vec<&Record> {
        self.child_positions(id)
            .iter()
            .map(|&pos| &self.records[pos])
            .collect()
    }

    /// All strict descendants of a record
    ///
    /// The subtree is explored depth-first with an explicit stack: each
    /// popped record contributes all of its children to the result before
    /// any of them is expanded. Every descendant appears exactly once and
    /// `id` itself is never included. Unknown IDs yield an empty vector.
    pub fn descendants(&self, id: &RecordId) -> Vec<&Record> {
        self.descendant_positions(id)
            .into_iter()
            .map(|pos| &self.records[pos])
            .collect()
    }

    /// The path from a record up to its topmost reachable ancestor
    ///
    /// The record itself comes first. The walk ends at a root, at a parent ID
    /// that is not in the store, or at the first record seen twice. Unknown
    /// IDs yield an empty vector.
    pub fn ancestors(&self, id: &RecordId) -> Vec<&Record> {
        self.path_ids(id)
            .into_iter()
            .filter_map(|id| self.get(id))
            .collect()
    }

    /// Labels along the path from the topmost ancestor down to a record
    ///
    /// Records without a string label contribute their ID instead. This is
    /// the hierarchy path a grid uses to place a row.
    pub fn data_path(&self, id: &RecordId) -> Vec<String> {
        let mut path: Vec<String> = self
            .ancestors(id)
            .into_iter()
            .map(|record| {
                record
                    .label()
                    .map(str::to_string)
                    .unwrap_or_else(|| record.id.to_string())
            })
            .collect();
        path.reverse();
        path
    }

    /// Insert a new record at the end of the store
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if the ID is taken, or
    /// [`StoreError::Cycle`] if cycles are rejected and the record would
    /// close one. The store is unchanged on error.
    pub fn add_item(&mut self, record: Record) -> Result<()> {
        if self.by_id.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        if let Some(parent) = &record.parent {
            self.check_cycle(&record.id, parent)?;
        }

        trace!("Adding record {} (parent {:?})", record.id, record.parent);
        self.records.push(record);
        self.register(self.records.len() - 1);
        Ok(())
    }

    /// Remove a record and its entire subtree
    ///
    /// Returns the removed records in their original order. Unknown IDs
    /// remove nothing.
    pub fn remove_item(&mut self, id: &RecordId) -> Vec<Record> {
        let pos = match self.by_id.get(id) {
            Some(&pos) => pos,
            None => {
                trace!("Ignoring removal of unknown record {}", id);
                return Vec::new();
            }
        };

        let mut doomed: HashSet<usize> = self.descendant_positions(id).into_iter().collect();
        doomed.insert(pos);

        let mut removed = Vec::with_capacity(doomed.len());
        for (pos, record) in std::mem::take(&mut self.records).into_iter().enumerate() {
            if doomed.contains(&pos) {
                removed.push(record);
            } else {
                self.records.push(record);
            }
        }

        debug!("Removed {} records under {}", removed.len(), id);
        self.reindex();
        removed
    }

    /// Merge new field values into an existing record
    ///
    /// The record is updated in place and keeps its position. Only a change
    /// of parent triggers a reindex.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has the patch's ID, or
    /// [`StoreError::Cycle`] if cycles are rejected and the new parent would
    /// close one. The store is unchanged on error.
    pub fn update_item(&mut self, patch: impl Into<RecordPatch>) -> Result<&Record> {
        let patch = patch.into();
        let pos = match self.by_id.get(&patch.id) {
            Some(&pos) => pos,
            None => return Err(StoreError::NotFound(patch.id)),
        };

        if let Some(Some(parent)) = &patch.parent {
            if self.records[pos].parent.as_ref() != Some(parent) {
                self.check_cycle(&patch.id, parent)?;
            }
        }

        if self.records[pos].apply(patch) {
            debug!("Record {} moved to a new parent", self.records[pos].id);
            self.reindex();
        }

        Ok(&self.records[pos])
    }

    /// Rebuild both indexes from the record list
    fn reindex(&mut self) {
        self.by_id.clear();
        self.children.clear();
        for pos in 0..self.records.len() {
            self.register(pos);
        }
        trace!(
            "Reindexed {} records under {} parents",
            self.records.len(),
            self.children.len()
        );
    }

    /// Add the record at `pos` to both indexes
    ///
    /// Positions must be registered in increasing order for children lists
    /// to follow the record list.
    fn register(&mut self, pos: usize) {
        let record = &self.records[pos];
        self.by_id.insert(record.id.clone(), pos);
        if let Some(parent) = &record.parent {
            self.children.entry(parent.clone()).or_default().push(pos);
        }
    }

    fn child_positions(&self, id: &RecordId) -> &[usize] {
        self.children.get(id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    fn descendant_positions(&self, id: &RecordId) -> Vec<usize> {
        let mut result = Vec::new();
        let mut seen: HashSet<usize> = self.by_id.get(id).copied().into_iter().collect();
        let mut frontier = vec![id];

        while let Some(current) = frontier.pop() {
            for &child in self.child_positions(current) {
                if !seen.insert(child) {
                    warn!("Parent cycle through {}, skipping", self.records[child].id);
                    continue;
                }
                result.push(child);
                frontier.push(&self.records[child].id);
            }
        }

        result
    }

    /// Fail if giving `id` the parent `parent` would close a cycle
    fn check_cycle(&self, id: &RecordId, parent: &RecordId) -> Result<()> {
        if self.options.cycle_policy == CyclePolicy::Allow {
            return Ok(());
        }

        // `parent` itself may not be in the store yet; the chain still yields it
        if self.parent_chain_from(parent).any(|ancestor| ancestor == id) {
            return Err(StoreError::Cycle {
                id: id.clone(),
                parent: parent.clone(),
            });
        }
        Ok(())
    }

    /// Follow raw `parent` fields from `start`, stopping at a repeat
    fn parent_chain_from<'a>(&'a self, start: &'a RecordId) -> impl Iterator<Item = &'a RecordId> {
        let mut seen = HashSet::new();
        let mut current = Some(start);
        std::iter::from_fn(move || {
            let id = current.take()?;
            if !seen.insert(id) {
                return None;
            }
            current = self.get(id).and_then(|record| record.parent.as_ref());
            Some(id)
        })
    }
}

impl Tree for TreeStore {
    fn get(&self, id: &RecordId) -> Option<&Record> {
        TreeStore::get(self, id)
    }

    fn child_ids<'a>(&'a self, id: &RecordId) -> Box<dyn Iterator<Item = &'a RecordId> + 'a> {
        Box::new(
            self.child_positions(id)
                .iter()
                .map(move |&pos| &self.records[pos].id),
        )
    }

    fn top_level_ids(&self) -> Box<dyn Iterator<Item = &RecordId> + '_> {
        Box::new(
            self.records
                .iter()
                .filter(move |record| match &record.parent {
                    Some(parent) => !self.by_id.contains_key(parent),
                    None => true,
                })
                .map(|record| &record.id),
        )
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }

    fn contains(&self, id: &RecordId) -> bool {
        TreeStore::contains(self, id)
    }
}

impl<'a> IntoIterator for &'a TreeStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
