//! # Field Encoder
//!
//! Maps an arbitrary identifier string to a field element:
//! `SHA-256(utf8(s))` read as a big-endian integer, reduced modulo the
//! BLS12-381 scalar prime. The prover re-encodes the same strings with the
//! same primitive, so this function must not change.

use kinship_core::{FieldElement, FieldError};
use sha2::{Digest, Sha256};

/// Sentinel string for the first two fields of a padding leaf.
pub const PADDING_SENTINEL: &str = "DUMMY";

/// Encode a non-empty string into the scalar field.
pub fn encode(s: &str) -> Result<FieldElement, FieldError> {
    if s.is_empty() {
        return Err(FieldError::InvalidInput(
            "cannot encode the empty string".to_string(),
        ));
    }
    let digest = Sha256::digest(s.as_bytes());
    Ok(FieldElement::from_be_bytes_reduced(&digest))
}
