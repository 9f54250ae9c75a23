//! Errors returned by store mutations

use derive_more::Display;

use crate::tree::RecordId;

/// Misuse of the store's mutation API
///
/// Every variant is raised before the store is touched, so a failed call
/// leaves the store exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum StoreError {
    /// A record with this ID is already in the store
    #[display(fmt = "record {} already exists", _0)]
    DuplicateId(RecordId),

    /// No record with this ID is in the store
    #[display(fmt = "record {} not found", _0)]
    NotFound(RecordId),

    /// Giving `id` the parent `parent` would close a parent cycle
    #[display(fmt = "parent {} of record {} would create a cycle", parent, id)]
    Cycle { id: RecordId, parent: RecordId },
}

impl std::error::Error for StoreError {}

/// Result type for store operations
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StoreError::DuplicateId(RecordId::from(3)).to_string(),
            "record 3 already exists"
        );
        assert_eq!(
            StoreError::NotFound(RecordId::from("a")).to_string(),
            "record a not found"
        );
        assert_eq!(
            StoreError::Cycle {
                id: RecordId::from(1),
                parent: RecordId::from(2),
            }
            .to_string(),
            "parent 2 of record 1 would create a cycle"
        );
    }
}
