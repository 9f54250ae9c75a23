//! Plain-text rendering of records and trees

use tree_store::prelude::*;

/// One display line for a record: its label followed by its ID
pub fn record_line(record: &Record) -> String {
    match record.label() {
        Some(label) => format!("{} [{}]", label, record.id),
        None => format!("[{}]", record.id),
    }
}

/// Render the whole forest as an indented outline, in pre-order
pub fn render_tree(store: &TreeStore) -> String {
    store
        .walk(TraversalOrder::PreOrder)
        .filter_map(|id| store.get(id))
        .map(|record| {
            let indent = "  ".repeat(store.depth(&record.id));
            format!("{}{}", indent, record_line(record))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a list of records, one per line
pub fn render_list(records: &[&Record]) -> String {
    if records.is_empty() {
        return "(none)".to_string();
    }
    records
        .iter()
        .map(|record| record_line(record))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short statistics about a store
pub fn render_summary(store: &TreeStore) -> String {
    let roots = store.iter().filter(|record| record.is_root()).count();
    let orphans = store.top_level_ids().count() - roots;
    format!(
        "Records: {}\nRoots: {}\nOrphans: {}\nLeaves: {}",
        store.len(),
        roots,
        orphans,
        store.leaves().len()
    )
}
