//! # kinship-zkp — Proving-Service Boundary
//!
//! Everything that crosses from the commitment engine to the external SNARK
//! prover:
//!
//! - **Payload schema** ([`ProofRequest`], [`ProofResponse`],
//!   [`VerifyRequest`]) with validation at the boundary. Nothing leaves this
//!   crate without passing [`ProofRequest::validate`].
//! - **Preparation** ([`ProofPreparer`]): resolve the target record, collect
//!   the candidate leaf set, build the Merkle proof, render the payload.
//! - **Client** ([`ProverClient`]): typed async HTTP calls to the prover's
//!   `/generate-proof` and `/verify-proof` endpoints.
//!
//! The prover itself (circuit, keys, Groth16) is out of scope.
//!
//! ## Crate Policy
//!
//! - The payload field names are a wire contract with the prover; they are
//!   never renamed through serde attributes.
//! - No retries. A failed call surfaces to the caller unchanged.

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod prepare;

pub use client::ProverClient;
pub use config::ProverConfig;
pub use error::{ClientError, ConfigError, PayloadError, PrepareError};
pub use payload::{DecodedRequest, ProofRequest, ProofResponse, VerifyRequest, VerifyResponse};
pub use prepare::{PreparedProof, ProofPreparer};
