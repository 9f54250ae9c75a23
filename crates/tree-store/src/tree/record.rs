//! Record types stored in the tree

use derive_more::Display;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::str::FromStr;

/// Key under which the display label of a record is stored
pub const LABEL_FIELD: &str = "label";

/// Unique identifier for a record within a store
///
/// Records coming from the outside world may be keyed by integers or by
/// strings. IDs are compared by equality only; `Int(1)` and `Str("1")` are
/// different IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Integer key
    #[display(fmt = "{}", _0)]
    Int(i64),
    /// String key
    #[display(fmt = "{}", _0)]
    Str(String),
}

impl RecordId {
    /// Returns the integer key, if this is an integer ID
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RecordId::Int(id) => Some(*id),
            RecordId::Str(_) => None,
        }
    }

    /// Returns the string key, if this is a string ID
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RecordId::Int(_) => None,
            RecordId::Str(id) => Some(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<i32> for RecordId {
    fn from(id: i32) -> Self {
        RecordId::Int(id.into())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        RecordId::Str(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Str(id.to_string())
    }
}

/// Parses anything that looks like an integer as `Int`, everything else as `Str`
impl FromStr for RecordId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Str(s.to_string())))
    }
}

/// A single record in the store
///
/// Besides its `id` and optional `parent`, a record carries arbitrary extra
/// fields which the store never interprets. On the wire this is a flat JSON
/// object: `{ "id": 4, "parent": 2, "label": "Docs", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record's unique ID
    pub id: RecordId,
    /// ID of the parent record, `None` for a root
    #[serde(default)]
    pub parent: Option<RecordId>,
    /// Every other field of the record
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a new root record with no extra fields
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            fields: Map::new(),
        }
    }

    /// Set the parent of this record
    pub fn with_parent(mut self, parent: impl Into<RecordId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the display label of this record
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.with_field(LABEL_FIELD, label.into())
    }

    /// Set an arbitrary field on this record
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Returns true if this record has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The record's display label, if it has a string `label` field
    pub fn label(&self) -> Option<&str> {
        self.fields.get(LABEL_FIELD).and_then(Value::as_str)
    }

    /// Get an extra field by name
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Merge a patch into this record in place
    ///
    /// Fields present in the patch overwrite existing ones; fields absent
    /// from the patch are left alone. Returns true if the parent changed.
    pub(crate) fn apply(&mut self, patch: RecordPatch) -> bool {
        debug_assert_eq!(self.id, patch.id);

        self.fields.extend(patch.fields);

        match patch.parent {
            Some(parent) if parent != self.parent => {
                self.parent = parent;
                true
            }
            _ => false,
        }
    }
}

/// A partial update for an existing record
///
/// `parent` is doubly optional: `None` leaves the parent untouched,
/// `Some(None)` turns the record into a root.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPatch {
    /// ID of the record to update
    pub id: RecordId,
    /// New parent, if it should change
    pub parent: Option<Option<RecordId>>,
    /// Fields to overwrite
    pub fields: Map<String, Value>,
}

impl RecordPatch {
    /// Create an empty patch for the given record
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            fields: Map::new(),
        }
    }

    /// Move the record under a new parent
    pub fn parent(mut self, parent: impl Into<RecordId>) -> Self {
        self.parent = Some(Some(parent.into()));
        self
    }

    /// Turn the record into a root
    pub fn detach(mut self) -> Self {
        self.parent = Some(None);
        self
    }

    /// Overwrite the display label
    pub fn label(self, label: impl Into<String>) -> Self {
        self.field(LABEL_FIELD, label.into())
    }

    /// Overwrite an arbitrary field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// A full record used as a patch replaces its parent and overwrites every field it carries
impl From<Record> for RecordPatch {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            parent: Some(record.parent),
            fields: record.fields,
        }
    }
}
