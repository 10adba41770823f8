//! Error types for the encoder, the hash oracle, and the Merkle engine.

use kinship_core::{ErrorKind, FieldError};
use thiserror::Error;

/// Failure inside the hash oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// A field element could not be converted to the oracle's scalar type.
    #[error("scalar conversion failed: {0}")]
    Conversion(String),

    /// The sponge rejected an input.
    #[error("poseidon absorb failed: {0}")]
    Absorb(String),
}

impl OracleError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Collaborator
    }
}

/// Errors from tree construction, proof extraction, and verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    /// Configured depth outside `1..=MAX_TREE_DEPTH`.
    #[error("invalid tree depth {depth}: must be between 1 and {max}")]
    InvalidDepth { depth: usize, max: usize },

    /// More records than the tree has leaf slots.
    #[error("{records} records exceed tree capacity of {capacity}")]
    CapacityExceeded { records: usize, capacity: usize },

    /// The queried record is not in the committed set.
    #[error("leaf not found in record set: {0}")]
    LeafNotFound(String),

    /// A path whose length differs from the tree depth.
    #[error("path length {actual} does not match tree depth {expected}")]
    BadPathLength { expected: usize, actual: usize },

    /// A leaf index with bits set above the tree depth.
    #[error("leaf index {index} out of range for {capacity} leaves")]
    IndexOutOfRange { index: u64, capacity: u64 },

    /// A freshly built proof did not reproduce the tree root.
    #[error("proof self-check failed: computed root {computed}, tree root {expected}")]
    SelfCheckFailed { computed: String, expected: String },

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl MerkleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDepth { .. } | Self::IndexOutOfRange { .. } => ErrorKind::InvalidInput,
            Self::CapacityExceeded { .. } | Self::SelfCheckFailed { .. } => ErrorKind::Internal,
            Self::LeafNotFound(_) => ErrorKind::LeafNotFound,
            Self::BadPathLength { .. } => ErrorKind::BadPathLength,
            Self::Field(e) => e.kind(),
            Self::Oracle(e) => e.kind(),
        }
    }

    /// Whether this error signals an engine invariant violation.
    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}
