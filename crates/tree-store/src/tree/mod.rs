//! Core tree abstraction over flat, parent-linked records
//!
//! Records only know their parent's ID. The store derives child fan-out and
//! ancestor chains from two lookup tables instead of linking nodes together.

mod record;
mod store;
mod traits;

pub use record::{Record, RecordId, RecordPatch, LABEL_FIELD};
pub use store::TreeStore;
pub use traits::{TraversalOrder, Tree, TreeTraversal, TreeWalker};

/// Re-export common types for convenience
pub mod prelude {
    pub use super::{Record, RecordId, RecordPatch, TraversalOrder, Tree, TreeStore, TreeTraversal};
}
