//! # Leaf Records
//!
//! A [`LeafRecord`] is the atomic provable fact: an ordered triple
//! `(ancestor_id, relation, descendant_id)`. The field order is fixed; the
//! engine hashes the three encoded fields in exactly this order.

use serde::{Deserialize, Serialize};

/// One committed fact. Immutable once handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeafRecord {
    /// Public identifier of the ancestor-side entity.
    pub ancestor_id: String,
    /// Relation label, e.g. `"Burn"` or `"son"`.
    pub relation: String,
    /// Public identifier of the descendant-side entity.
    pub descendant_id: String,
}

impl LeafRecord {
    pub fn new(
        ancestor_id: impl Into<String>,
        relation: impl Into<String>,
        descendant_id: impl Into<String>,
    ) -> Self {
        Self {
            ancestor_id: ancestor_id.into(),
            relation: relation.into(),
            descendant_id: descendant_id.into(),
        }
    }

    /// Whether every field is non-empty after trimming.
    ///
    /// Malformed records are excluded from the leaf set before a tree is
    /// built; they are never committed.
    pub fn is_well_formed(&self) -> bool {
        self.fields().iter().all(|f| !f.trim().is_empty())
    }

    /// A copy with surrounding whitespace removed from each field.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.ancestor_id.trim(),
            self.relation.trim(),
            self.descendant_id.trim(),
        )
    }

    /// The three fields in commitment order.
    pub fn fields(&self) -> [&str; 3] {
        [&self.ancestor_id, &self.relation, &self.descendant_id]
    }
}

impl std::fmt::Display for LeafRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.ancestor_id, self.relation, self.descendant_id
        )
    }
}
