//! # Error Types — Shared Error Taxonomy
//!
//! Defines the error kinds used throughout the workspace and the field-level
//! error type. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Every crate owns its own error enum; each variant maps to exactly one
//!   [`ErrorKind`].
//! - User-facing kinds (`NotFound`, `LeafNotFound`, `InvalidInput`) are
//!   distinguished from fatal invariant violations (`BadPathLength`,
//!   `Internal`), which must abort the request.

use thiserror::Error;

/// Classification of every domain error in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty or malformed input offered to an encoder or parser.
    InvalidInput,
    /// The queried record is not a member of the committed set.
    LeafNotFound,
    /// An identifier could not be resolved.
    NotFound,
    /// A stored record is missing a link or field it needs to be proven.
    InvalidState,
    /// A proof path does not have exactly the configured depth.
    BadPathLength,
    /// A collaborator (hash oracle, store, proving service) failed.
    Collaborator,
    /// An engine invariant was violated.
    Internal,
}

impl ErrorKind {
    /// Whether this kind signals a bug that must abort the request.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::BadPathLength | Self::Internal)
    }

    /// Returns the kind identifier string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "INVALID_INPUT",
            Self::LeafNotFound => "LEAF_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidState => "INVALID_STATE",
            Self::BadPathLength => "BAD_PATH_LENGTH",
            Self::Collaborator => "COLLABORATOR",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error producing or parsing a field element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The encoder was handed an empty string.
    #[error("invalid encoder input: {0}")]
    InvalidInput(String),

    /// The string is not a 64-digit hex value.
    #[error("malformed hex32 value: {0}")]
    MalformedHex(String),

    /// The value is not strictly below the field modulus.
    #[error("value is not a canonical field element: {0}")]
    NonCanonical(String),
}

impl FieldError {
    /// Error kind for caller branching.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}
