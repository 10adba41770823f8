//! Error types for lineage resolution and the persistence collaborator.

use kinship_core::ErrorKind;
use thiserror::Error;

/// Failure reported by a [`LineageStore`](crate::LineageStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("lineage store unavailable: {0}")]
    Unavailable(String),

    /// Two records claim the same internal id.
    #[error("conflicting record: {0}")]
    Conflict(String),

    /// A snapshot could not be decoded.
    #[error("snapshot decode failed: {0}")]
    Decode(String),
}

/// Errors from [`LineageResolver`](crate::LineageResolver).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineageError {
    /// No record matches the identifier.
    #[error("not found: {0}")]
    NotFound(String),

    /// A record exists but cannot be proven as stored.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LineageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Store(_) => ErrorKind::Collaborator,
        }
    }
}
