//! # Proof Preparation
//!
//! Glue between the lineage resolver and the Merkle engine. A preparation
//! selects the target triple, commits the full candidate set, builds the
//! authentication path and renders a validated [`ProofRequest`].
//!
//! The candidate set is re-read from the store on every call, so the root
//! in a request always reflects the store at preparation time.

use std::marker::PhantomData;

use kinship_core::LeafRecord;
use kinship_crypto::{HashOracle, MerkleEngine, MerkleProof};
use kinship_lineage::{EntityFamily, LineageResolver, LineageStore};
use serde::Serialize;

use crate::error::PrepareError;
use crate::payload::ProofRequest;

/// A proof ready to send to the prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedProof {
    /// The committed triple.
    pub record: LeafRecord,
    pub proof: MerkleProof,
    pub request: ProofRequest,
    /// Real (non-padding) leaves in the tree.
    pub leaf_count: usize,
}

/// Prepares proof requests for one entity family.
pub struct ProofPreparer<F, S, H> {
    resolver: LineageResolver<F, S>,
    engine: MerkleEngine<H>,
    _family: PhantomData<fn() -> F>,
}

impl<F, S, H> ProofPreparer<F, S, H>
where
    F: EntityFamily,
    S: LineageStore<F>,
    H: HashOracle,
{
    pub fn new(resolver: LineageResolver<F, S>, engine: MerkleEngine<H>) -> Self {
        Self {
            resolver,
            engine,
            _family: PhantomData,
        }
    }

    pub fn resolver(&self) -> &LineageResolver<F, S> {
        &self.resolver
    }

    pub fn engine(&self) -> &MerkleEngine<H> {
        &self.engine
    }

    /// Proof that `descendant_id` holds `relationship` under its parent.
    ///
    /// For the clinical family this is a treatment proof: the patient
    /// identifier with the treatment received.
    pub fn prepare_treatment_proof(
        &self,
        descendant_id: &str,
        relationship: &str,
    ) -> Result<PreparedProof, PrepareError> {
        let record = self
            .resolver
            .select_proof_triple(descendant_id, relationship)?;
        self.prepare_for(record)
    }

    /// Proof for the member an identifier resolves to. Group identifiers are
    /// represented by a member as in
    /// [`LineageResolver::resolve_member`].
    pub fn prepare_lineage_proof(&self, identifier: &str) -> Result<PreparedProof, PrepareError> {
        let member = self.resolver.resolve_member(identifier)?;
        let record = self.resolver.triple_for_member(&member)?;
        self.prepare_for(record)
    }

    /// Proof for an explicit triple against the current candidate set.
    pub fn prepare_for(&self, record: LeafRecord) -> Result<PreparedProof, PrepareError> {
        let leaves = self.resolver.candidate_leaves()?;
        let proof = self.engine.build_proof(&leaves, &record)?;
        let request = ProofRequest::from_proof(&record, &proof);
        request.validate(self.engine.depth())?;

        tracing::info!(
            family = F::NAME,
            record = %record,
            leaf_index = proof.leaf_index,
            root = %proof.root,
            leaves = leaves.len(),
            "prepared proof request"
        );
        Ok(PreparedProof {
            record,
            proof,
            request,
            leaf_count: leaves.len(),
        })
    }
}
