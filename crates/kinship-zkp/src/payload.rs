//! # Prover Payloads
//!
//! Wire types exchanged with the external prover.
//!
//! | Direction | Type | Endpoint |
//! |-----------|------|----------|
//! | engine → prover | [`ProofRequest`] | `POST /generate-proof` |
//! | prover → engine | [`ProofResponse`] | response to `/generate-proof` |
//! | engine → prover | [`VerifyRequest`] | `POST /verify-proof` |
//! | prover → engine | [`VerifyResponse`] | response to `/verify-proof` |
//!
//! Field elements cross the wire as hex32 strings (`0x` + 64 lowercase hex
//! digits, big-endian). Public inputs in prover responses are raw 32-byte
//! little-endian scalar encodings, in the order `[merkle_root, commitment]`.

use kinship_core::{is_hex32, FieldElement, FieldError, LeafRecord};
use kinship_crypto::{HashOracle, MerkleEngine, MerkleProof, MAX_TREE_DEPTH};
use serde::{Deserialize, Serialize};

use crate::error::{PayloadError, PrepareError};

/// Number of public inputs the circuit exposes.
pub const PUBLIC_INPUT_COUNT: usize = 2;

/// Byte length of one public input.
pub const PUBLIC_INPUT_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Proof request
// ---------------------------------------------------------------------------

/// Inputs for one membership proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequest {
    pub ancestor_id: String,
    pub relation: String,
    pub descendant_id: String,
    pub merkle_leaf_index: u64,
    /// Siblings leaf-to-root, hex32.
    pub merkle_path: Vec<String>,
    /// hex32.
    pub merkle_root: String,
}

/// A [`ProofRequest`] parsed back into engine types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRequest {
    pub record: LeafRecord,
    pub leaf_index: u64,
    pub path: Vec<FieldElement>,
    pub root: FieldElement,
}

impl ProofRequest {
    /// Render a proof for `record` into wire form.
    pub fn from_proof(record: &LeafRecord, proof: &MerkleProof) -> Self {
        Self {
            ancestor_id: record.ancestor_id.clone(),
            relation: record.relation.clone(),
            descendant_id: record.descendant_id.clone(),
            merkle_leaf_index: proof.leaf_index,
            merkle_path: proof.path.iter().map(FieldElement::to_hex).collect(),
            merkle_root: proof.root.to_hex(),
        }
    }

    /// The committed triple.
    pub fn record(&self) -> LeafRecord {
        LeafRecord::new(&self.ancestor_id, &self.relation, &self.descendant_id)
    }

    /// Check the payload against a tree of the given depth.
    pub fn validate(&self, depth: usize) -> Result<(), PayloadError> {
        self.decode(depth).map(|_| ())
    }

    /// Validate and parse into engine types.
    pub fn decode(&self, depth: usize) -> Result<DecodedRequest, PayloadError> {
        for (name, value) in [
            ("ancestor_id", &self.ancestor_id),
            ("relation", &self.relation),
            ("descendant_id", &self.descendant_id),
        ] {
            if value.trim().is_empty() {
                return Err(PayloadError::EmptyField(name));
            }
        }

        check_depth(depth)?;

        if self.merkle_path.len() != depth {
            tracing::error!(
                expected = depth,
                actual = self.merkle_path.len(),
                "proof request has wrong path length"
            );
            return Err(PayloadError::BadPathLength {
                expected: depth,
                actual: self.merkle_path.len(),
            });
        }

        let capacity = 1u64 << depth;
        if self.merkle_leaf_index >= capacity {
            return Err(PayloadError::IndexOutOfRange {
                index: self.merkle_leaf_index,
                capacity,
            });
        }

        let path = self
            .merkle_path
            .iter()
            .enumerate()
            .map(|(k, h)| parse_hex32(&format!("merkle_path[{k}]"), h))
            .collect::<Result<Vec<_>, _>>()?;
        let root = parse_hex32("merkle_root", &self.merkle_root)?;

        Ok(DecodedRequest {
            record: self.record(),
            leaf_index: self.merkle_leaf_index,
            path,
            root,
        })
    }

    /// Recompute the root from the payload and compare.
    pub fn verify_locally<H: HashOracle>(
        &self,
        engine: &MerkleEngine<H>,
    ) -> Result<bool, PrepareError> {
        let decoded = self.decode(engine.depth())?;
        let leaf = engine.leaf_commitment(&decoded.record)?;
        Ok(engine.verify(&leaf, &decoded.path, &decoded.root, decoded.leaf_index)?)
    }
}

/// Reject depths no tree can have before any shift by `depth`.
pub(crate) fn check_depth(depth: usize) -> Result<(), PayloadError> {
    if depth == 0 || depth > MAX_TREE_DEPTH {
        return Err(PayloadError::InvalidDepth {
            depth,
            max: MAX_TREE_DEPTH,
        });
    }
    Ok(())
}

fn parse_hex32(field: &str, value: &str) -> Result<FieldElement, PayloadError> {
    if !is_hex32(value) {
        return Err(PayloadError::Field {
            field: field.to_string(),
            source: FieldError::MalformedHex(value.to_string()),
        });
    }
    FieldElement::from_hex(value).map_err(|source| PayloadError::Field {
        field: field.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Prover responses and verification
// ---------------------------------------------------------------------------

/// Proof bytes and public inputs returned by `/generate-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofResponse {
    pub proof: Vec<u8>,
    pub public_inputs: Vec<Vec<u8>>,
}

impl ProofResponse {
    /// Whether the first public input is `root`.
    pub fn commits_to_root(&self, root: &FieldElement) -> bool {
        self.public_inputs
            .first()
            .is_some_and(|input| input.as_slice() == to_le_bytes(root))
    }

    /// The request that asks the prover to verify this proof.
    pub fn to_verify_request(&self) -> Result<VerifyRequest, PayloadError> {
        let req = VerifyRequest {
            proof: self.proof.clone(),
            public_inputs: self.public_inputs.clone(),
        };
        req.validate()?;
        Ok(req)
    }
}

/// Little-endian scalar encoding used for public inputs.
pub fn to_le_bytes(fe: &FieldElement) -> [u8; 32] {
    let mut bytes = fe.to_be_bytes();
    bytes.reverse();
    bytes
}

/// Body of `POST /verify-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub proof: Vec<u8>,
    pub public_inputs: Vec<Vec<u8>>,
}

impl VerifyRequest {
    /// Exactly two public inputs of exactly 32 bytes each.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.public_inputs.len() != PUBLIC_INPUT_COUNT {
            return Err(PayloadError::PublicInputs(format!(
                "expected exactly {PUBLIC_INPUT_COUNT} public inputs, got {}",
                self.public_inputs.len()
            )));
        }
        for (i, input) in self.public_inputs.iter().enumerate() {
            if input.len() != PUBLIC_INPUT_LEN {
                return Err(PayloadError::PublicInputs(format!(
                    "public input {i} must be {PUBLIC_INPUT_LEN} bytes, got {}",
                    input.len()
                )));
            }
        }
        if self.proof.is_empty() {
            return Err(PayloadError::EmptyField("proof"));
        }
        Ok(())
    }
}

/// Verdict from `/verify-proof`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}
