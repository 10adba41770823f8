//! Error types for the proving-service boundary.

use kinship_core::{ErrorKind, FieldError};
use kinship_crypto::MerkleError;
use kinship_lineage::LineageError;
use thiserror::Error;

/// A payload failed boundary validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload field {0} is empty")]
    EmptyField(&'static str),

    #[error("tree depth {depth} outside 1..={max}")]
    InvalidDepth { depth: usize, max: usize },

    #[error("merkle_path has {actual} entries, expected {expected}")]
    BadPathLength { expected: usize, actual: usize },

    #[error("merkle_leaf_index {index} out of range for {capacity} leaves")]
    IndexOutOfRange { index: u64, capacity: u64 },

    #[error("{field}: {source}")]
    Field {
        field: String,
        #[source]
        source: FieldError,
    },

    #[error("invalid public inputs: {0}")]
    PublicInputs(String),
}

impl PayloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadPathLength { .. } => ErrorKind::BadPathLength,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// Failure assembling a proof request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error(transparent)]
    Lineage(#[from] LineageError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

impl PrepareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lineage(e) => e.kind(),
            Self::Merkle(e) => e.kind(),
            Self::Payload(e) => e.kind(),
        }
    }

    /// Whether the error signals a bug rather than a bad request.
    pub fn is_fatal(&self) -> bool {
        self.kind().is_fatal()
    }
}

/// Prover configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("KINSHIP_PROVER_URL environment variable is required")]
    MissingUrl,

    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

/// Errors from [`ProverClient`](crate::ProverClient).
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The prover answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("failed to decode {endpoint} response: {source}")]
    Deserialization {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Payload(e) => e.kind(),
            Self::Config(_) => ErrorKind::InvalidInput,
            _ => ErrorKind::Collaborator,
        }
    }
}
