//! # kinship-lineage — Lineage Resolution
//!
//! Resolves which record a proof should be built for and reconstructs the
//! ancestry around it.
//!
//! Records come in families that share one shape: *groups* form a
//! self-referential parent hierarchy and *members* hang off exactly one
//! group. A member maps to one [`LeafRecord`](kinship_core::LeafRecord)
//! `(group.public_id, member.relationship, member.public_id)`.
//!
//! ## Families
//!
//! | Family | Group | Member |
//! |--------|-------|--------|
//! | [`Genealogy`] | [`Family`] | [`Relation`] |
//! | [`Civil`] | [`Country`] | [`Citizen`] |
//! | [`Clinical`] | [`Hospital`] | [`Patient`] |
//!
//! All three run through the same [`LineageResolver`]; only the
//! [`EntityFamily`] mapping differs.
//!
//! ## Crate Policy
//!
//! - Depends only on `kinship-core` internally.
//! - The resolver never mutates the store.
//! - Ancestor walks are iterative and bounded; a cyclic parent relation
//!   terminates with a warning instead of looping.

pub mod entity;
pub mod error;
pub mod families;
pub mod resolver;
pub mod store;

pub use entity::{AncestorSummary, EntityFamily, GroupEntity, MemberEntity, MemberSummary};
pub use error::{LineageError, StoreError};
pub use families::{
    Citizen, Civil, Clinical, Country, Family, Genealogy, Hospital, Patient, Relation,
};
pub use resolver::{filter_leaf_records, LineageConfig, LineageResolver, ResolvedLineage};
pub use store::{ArenaStore, GroupWithChildren, LineageSnapshot, LineageStore};
