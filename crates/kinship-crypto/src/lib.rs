//! # kinship-crypto — Commitment Primitives
//!
//! Provides the cryptographic building blocks for the Kinship engine:
//!
//! - **Field Encoder**: SHA-256 of an identifier string, reduced into the
//!   BLS12-381 scalar field.
//! - **Hash Oracle**: sealed [`HashOracle`] trait with the Poseidon
//!   implementation shared with the proving circuit.
//! - **Merkle Engine**: fixed-depth binary tree with deterministic padding,
//!   authentication path extraction, and verification.
//!
//! ## Crate Policy
//!
//! - Depends only on `kinship-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   SHA-256 and real Poseidon constants.
//! - No `unsafe` code.

pub mod encoder;
pub mod error;
pub mod merkle;
pub mod oracle;

pub use encoder::{encode, PADDING_SENTINEL};
pub use error::{MerkleError, OracleError};
pub use merkle::{
    verify_proof, EngineConfig, MerkleEngine, MerkleProof, MerkleTree, MAX_TREE_DEPTH,
    MERKLE_PATH_LEN,
};
pub use oracle::{HashOracle, PoseidonOracle};
