//! Property tests over randomly shaped forests

use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashSet;
use tree_store::prelude::*;

/// Record `i` either is a root or points at some record before it, so the
/// generated forest is always acyclic. A few records point at IDs that do
/// not exist.
fn forest() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((any::<Option<Index>>(), any::<bool>()), 1..60).prop_map(|shape| {
        shape
            .into_iter()
            .enumerate()
            .map(|(i, (parent, orphan))| {
                let record = Record::new(i as i64);
                match parent {
                    Some(_) if orphan => record.with_parent(-1 - i as i64),
                    Some(index) if i > 0 => record.with_parent(index.index(i) as i64),
                    _ => record,
                }
            })
            .collect()
    })
}

/// Brute force: does following parents from `record` reach `ancestor`?
fn reaches(records: &[Record], record: &Record, ancestor: &RecordId) -> bool {
    let mut current = record.parent.clone();
    while let Some(parent) = current {
        if &parent == ancestor {
            return true;
        }
        current = records
            .iter()
            .find(|r| r.id == parent)
            .and_then(|r| r.parent.clone());
    }
    false
}

fn id_set<'a>(records: impl IntoIterator<Item = &'a Record>) -> HashSet<RecordId> {
    records.into_iter().map(|r| r.id.clone()).collect()
}

proptest! {
    #[test]
    fn lookup_finds_every_record(records in forest()) {
        let store = TreeStore::new(records.clone()).unwrap();
        for record in &records {
            prop_assert_eq!(store.get(&record.id), Some(record));
        }
        prop_assert!(store.get(&RecordId::from("never")).is_none());
    }

    #[test]
    fn children_are_complete_and_ordered(records in forest()) {
        let store = TreeStore::new(records.clone()).unwrap();
        for record in &records {
            if let Some(parent) = &record.parent {
                let siblings = store.children(parent);
                prop_assert_eq!(siblings.iter().filter(|r| r.id == record.id).count(), 1);

                let expected: Vec<_> = records
                    .iter()
                    .filter(|r| r.parent.as_ref() == Some(parent))
                    .collect();
                prop_assert_eq!(siblings, expected);
            }
        }
    }

    #[test]
    fn descendants_are_exactly_the_reachable_records(records in forest(), pick in any::<Index>()) {
        let store = TreeStore::new(records.clone()).unwrap();
        let root = &records[pick.index(records.len())].id;

        let found = store.descendants(root);
        let unique = id_set(found.iter().copied());
        prop_assert_eq!(unique.len(), found.len());
        prop_assert!(!unique.contains(root));

        let expected = id_set(records.iter().filter(|r| reaches(&records, r, root)));
        prop_assert_eq!(unique, expected);
    }

    #[test]
    fn ancestors_follow_parent_links(records in forest(), pick in any::<Index>()) {
        let store = TreeStore::new(records.clone()).unwrap();
        let start = &records[pick.index(records.len())].id;

        let path = store.ancestors(start);
        prop_assert_eq!(path.first().map(|r| &r.id), Some(start));
        for pair in path.windows(2) {
            prop_assert_eq!(pair[0].parent.as_ref(), Some(&pair[1].id));
        }

        let last = path.last().unwrap();
        let terminated = match &last.parent {
            None => true,
            Some(parent) => !store.contains(parent),
        };
        prop_assert!(terminated);
    }

    #[test]
    fn removal_cascades_and_is_idempotent(records in forest(), pick in any::<Index>()) {
        let mut store = TreeStore::new(records.clone()).unwrap();
        let target = records[pick.index(records.len())].id.clone();

        let mut expected = id_set(store.descendants(&target));
        expected.insert(target.clone());

        let removed = store.remove_item(&target);
        prop_assert_eq!(id_set(&removed), expected.clone());
        prop_assert_eq!(store.len() + removed.len(), records.len());
        for record in &records {
            prop_assert_eq!(store.contains(&record.id), !expected.contains(&record.id));
        }

        prop_assert!(store.remove_item(&target).is_empty());
    }

    #[test]
    fn duplicate_add_never_mutates(records in forest(), pick in any::<Index>()) {
        let mut store = TreeStore::new(records.clone()).unwrap();
        let existing = records[pick.index(records.len())].id.clone();

        let result = store.add_item(Record::new(existing.clone()).with_label("dup"));
        prop_assert_eq!(result, Err(StoreError::DuplicateId(existing)));
        prop_assert_eq!(store.all(), records.as_slice());
    }

    #[test]
    fn reparenting_moves_between_buckets(records in forest(), pick in any::<Index>()) {
        let mut store = TreeStore::new(records.clone()).unwrap();
        let moved = records[pick.index(records.len())].clone();
        let new_parent = RecordId::from("adopter");

        store
            .update_item(RecordPatch::new(moved.id.clone()).parent(new_parent.clone()))
            .unwrap();

        prop_assert_eq!(ids_of(store.children(&new_parent)), vec![moved.id.clone()]);
        if let Some(old) = &moved.parent {
            prop_assert!(store.children(old).iter().all(|r| r.id != moved.id));
        }
        prop_assert_eq!(store.len(), records.len());
    }
}

fn ids_of(records: Vec<&Record>) -> Vec<RecordId> {
    records.into_iter().map(|r| r.id.clone()).collect()
}
