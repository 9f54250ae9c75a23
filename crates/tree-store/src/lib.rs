//! Tree Store Library
//!
//! An in-memory store for flat records that form a forest through parent
//! IDs, with constant-time lookup by ID and by parent.
//!
//! # Core Concepts
//!
//! - **Record**: A row with an `id`, an optional `parent` and free-form fields
//! - **TreeStore**: The ordered record list plus its ID and children indexes
//! - **Tree**: Generic trait for parent-linked collections, with walkers
//!
//! # Example
//!
//! ```
//! use tree_store::prelude::*;
//!
//! let store = TreeStore::new(vec![
//!     Record::new(1).with_label("Root"),
//!     Record::new(2).with_parent(1).with_label("Left"),
//!     Record::new(3).with_parent(1).with_label("Right"),
//!     Record::new(4).with_parent(2).with_label("Leaf"),
//! ])
//! .expect("unique ids");
//!
//! assert_eq!(store.children(&1.into()).len(), 2);
//! assert_eq!(store.descendants(&1.into()).len(), 3);
//!
//! for id in store.walk(TraversalOrder::PreOrder) {
//!     let record = store.get(id).unwrap();
//!     println!("{:indent$}{}", "", record.label().unwrap_or("?"), indent = store.depth(id) * 2);
//! }
//! ```

pub mod error;
pub mod loader;
pub mod options;
pub mod tree;

pub use error::{Result, StoreError};
pub use options::{CyclePolicy, StoreOptions};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::StoreError;
    pub use crate::options::{CyclePolicy, StoreOptions};
    pub use crate::tree::prelude::*;
}
