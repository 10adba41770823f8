//! # Field Elements — BLS12-381 Scalar Residues
//!
//! Every hash input and output in the engine is a residue modulo the
//! BLS12-381 scalar field prime
//! `p = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001`.
//!
//! ## Representation
//!
//! Values are held as 32 big-endian bytes. The canonical external form is
//! `0x` followed by 64 lowercase hex digits ("hex32"). Parsing accepts either
//! case but rejects anything `>= p`, so equality of two parsed values never
//! depends on the casing or padding of their source strings.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FieldError;

/// The field modulus as 64 hex digits (no prefix).
pub const FIELD_MODULUS_HEX: &str =
    "73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";

/// The field modulus as 32 big-endian bytes.
pub const FIELD_MODULUS_BYTES: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

/// A canonical element of the BLS12-381 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Build an element from 32 big-endian bytes.
    ///
    /// Rejects values that are not strictly below the modulus.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Result<Self, FieldError> {
        // Lexicographic order on big-endian arrays is numeric order.
        if bytes >= FIELD_MODULUS_BYTES {
            return Err(FieldError::NonCanonical(format!("0x{}", encode_hex(&bytes))));
        }
        Ok(Self(bytes))
    }

    /// Interpret `bytes` as a big-endian unsigned integer of any width and
    /// reduce it modulo `p`.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        let modulus = BigUint::from_bytes_be(&FIELD_MODULUS_BYTES);
        let reduced = BigUint::from_bytes_be(bytes) % modulus;
        let raw = reduced.to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - raw.len()..].copy_from_slice(&raw);
        Self(out)
    }

    /// Embed a small integer. Every `u64` is below the modulus.
    pub fn from_u64(value: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }

    /// The 32 big-endian bytes of this element.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Borrow the big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as `0x` + 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", encode_hex(&self.0))
    }

    /// Parse a hex32 string. The `0x` prefix is optional and digits may be
    /// either case; exactly 64 digits are required.
    pub fn from_hex(s: &str) -> Result<Self, FieldError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(FieldError::MalformedHex(s.to_string()));
        }
        let mut out = [0u8; 32];
        for (i, chunk) in digits.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| FieldError::MalformedHex(s.to_string()))?;
            out[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| FieldError::MalformedHex(s.to_string()))?;
        }
        Self::from_be_bytes(out)
    }
}

/// Whether `s` is in the strict external hex32 form `0x` + 64 hex digits.
///
/// Does not check the value against the modulus; use
/// [`FieldElement::from_hex`] for that.
pub fn is_hex32(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(digits) => digits.len() == 64 && digits.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl FromStr for FieldElement {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
