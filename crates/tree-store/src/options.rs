//! Configuration options for a tree store.
//!
//! This module provides the `StoreOptions` struct which controls how the
//! store treats parent cycles and how much room it reserves up front.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How mutations that would close a parent cycle are handled.
///
/// Traversals never loop regardless of this setting: they stop at the first
/// record they have already visited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Accept the mutation; the cycle is the caller's responsibility.
    #[default]
    #[display(fmt = "allow")]
    Allow,

    /// Refuse the mutation with `StoreError::Cycle`.
    #[display(fmt = "reject")]
    Reject,
}

impl FromStr for CyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(CyclePolicy::Allow),
            "reject" => Ok(CyclePolicy::Reject),
            other => Err(format!("unknown cycle policy: {other}")),
        }
    }
}

/// Configuration options for a tree store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Handling of mutations that would create a parent cycle.
    pub cycle_policy: CyclePolicy,

    /// Number of records to reserve room for when the store is built.
    pub initial_capacity: usize,
}

impl StoreOptions {
    /// Create new store options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cycle policy.
    pub fn cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    /// Reject mutations that would create a parent cycle.
    pub fn reject_cycles(self) -> Self {
        self.cycle_policy(CyclePolicy::Reject)
    }

    /// Set the initial record capacity.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
