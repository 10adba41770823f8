//! # Identity — Internal Node Identifiers
//!
//! Groups and members in a lineage store are addressed by a numeric
//! [`NodeId`]. Public identifiers (the strings committed into leaves) are a
//! separate concern and live on the records themselves.

use serde::{Deserialize, Serialize};

/// Internal identifier of a group or member in a lineage store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
