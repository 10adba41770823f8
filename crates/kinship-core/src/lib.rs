//! # kinship-core — Foundational Types for the Kinship Engine
//!
//! This crate is the leaf of the workspace DAG. It defines the value types
//! that every other crate exchanges: field elements, leaf record triples,
//! and internal node identifiers.
//!
//! ## Key Design Principles
//!
//! 1. **Canonical field elements only.** A [`FieldElement`] can only hold a
//!    value strictly below the BLS12-381 scalar modulus. Parsing rejects
//!    non-canonical encodings instead of silently reducing them, so two equal
//!    values always have one hex32 rendering.
//!
//! 2. **One leaf shape.** Every provable fact is a [`LeafRecord`]
//!    `(ancestor_id, relation, descendant_id)`. The field order is part of the
//!    wire contract with the proving circuit.
//!
//! 3. **Kinds, not strings.** Every domain error in the workspace reports an
//!    [`ErrorKind`] so callers can branch without matching on messages.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kinship-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod identity;
pub mod leaf;

// Re-export primary types for ergonomic imports.
pub use error::{ErrorKind, FieldError};
pub use field::{is_hex32, FieldElement, FIELD_MODULUS_BYTES, FIELD_MODULUS_HEX};
pub use identity::NodeId;
pub use leaf::LeafRecord;
