//! Parsing flat record lists from JSON
//!
//! The expected input is an array of objects shaped like
//! `{ "id": 1, "parent": null, "label": "Root", ... }`.

use crate::tree::Record;
use std::io::Read;

/// Parse records from a JSON string
pub fn from_json_str(json: &str) -> serde_json::Result<Vec<Record>> {
    serde_json::from_str(json)
}

/// Parse records from a reader producing JSON
pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Vec<Record>> {
    serde_json::from_reader(reader)
}

/// Serialize records back to pretty-printed JSON
pub fn to_json_string(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
