//! # Merkle Engine — Fixed-Depth Commitment Trees
//!
//! Builds a complete binary tree of depth `D` over leaf commitments, extracts
//! authentication paths, and verifies them.
//!
//! ## Algorithm
//!
//! - Leaf: `Hash3(enc(ancestor_id), enc(relation), enc(descendant_id))`.
//! - Padding leaf at position `n`: `Hash3(enc("DUMMY"), enc("DUMMY"), enc(n))`.
//! - Node: `Hash2(left, right)`.
//!
//! Level 0 always holds exactly `2^D` leaves; real commitments come first in
//! input order, then padding. Level `l + 1` index `i` is
//! `Hash2(level[l][2i], level[l][2i + 1])`.
//!
//! The path is read leaf-to-root. At depth `k` the sibling is at
//! `idx ^ 1` and `idx` then shifts right by one. Verification reverses this:
//! bit `k` of the leaf index set means the current node is a right child.
//!
//! ## Security Invariant
//!
//! Every path handed out has been recomputed to the tree root before it
//! leaves the engine, and every path accepted for verification must have
//! exactly `D` elements. Roots are compared by value.

use kinship_core::{FieldElement, LeafRecord};
use serde::{Deserialize, Serialize};

use crate::encoder::{encode, PADDING_SENTINEL};
use crate::error::MerkleError;
use crate::oracle::HashOracle;

/// Tree depth shared with the proving circuit.
pub const MERKLE_PATH_LEN: usize = 3;

/// Upper bound on configurable depth (about a million leaves).
pub const MAX_TREE_DEPTH: usize = 20;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Tree depth `D`. The tree holds `2^D` leaves.
    pub depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: MERKLE_PATH_LEN,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `KINSHIP_MERKLE_DEPTH` | `3` |
    ///
    /// Unparseable values fall back to the default. Range is checked when
    /// the engine is constructed.
    pub fn from_env() -> Self {
        let depth = match std::env::var("KINSHIP_MERKLE_DEPTH") {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "ignoring unparseable KINSHIP_MERKLE_DEPTH");
                MERKLE_PATH_LEN
            }),
            Err(_) => MERKLE_PATH_LEN,
        };
        Self { depth }
    }

    /// Number of leaf slots, `2^depth`. Saturates at `usize::MAX` for depths
    /// that [`validate`](Self::validate) rejects.
    pub fn capacity(&self) -> usize {
        u32::try_from(self.depth)
            .ok()
            .and_then(|d| 1usize.checked_shl(d))
            .unwrap_or(usize::MAX)
    }

    /// Depth must lie in `1..=MAX_TREE_DEPTH`.
    pub fn validate(&self) -> Result<(), MerkleError> {
        if self.depth == 0 || self.depth > MAX_TREE_DEPTH {
            return Err(MerkleError::InvalidDepth {
                depth: self.depth,
                max: MAX_TREE_DEPTH,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree and proof types
// ---------------------------------------------------------------------------

/// A fully built tree. `levels[0]` are the leaves, `levels[depth]` the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<FieldElement>>,
}

impl MerkleTree {
    /// The root commitment.
    pub fn root(&self) -> FieldElement {
        // Construction always pushes a single-element top level.
        self.levels
            .last()
            .and_then(|top| top.first())
            .copied()
            .unwrap_or(FieldElement::ZERO)
    }

    /// The `2^D` padded leaves.
    pub fn leaves(&self) -> &[FieldElement] {
        self.levels.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Nodes at `level`, or `None` above the root.
    pub fn level(&self, level: usize) -> Option<&[FieldElement]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// First position at which `leaf` occurs among the padded leaves.
    pub fn position_of(&self, leaf: &FieldElement) -> Option<usize> {
        self.leaves().iter().position(|l| l == leaf)
    }

    /// Sibling path from leaf `index` up to (not including) the root.
    pub fn authentication_path(&self, index: usize) -> Result<Vec<FieldElement>, MerkleError> {
        let capacity = self.leaves().len();
        if index >= capacity {
            return Err(MerkleError::IndexOutOfRange {
                index: index as u64,
                capacity: capacity as u64,
            });
        }
        let mut idx = index;
        let mut path = Vec::with_capacity(self.depth());
        for level in &self.levels[..self.depth()] {
            path.push(level[idx ^ 1]);
            idx >>= 1;
        }
        Ok(path)
    }
}

/// Membership proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Position of the leaf among the `2^D` padded leaves.
    pub leaf_index: u64,
    /// The leaf commitment being proven.
    pub leaf: FieldElement,
    /// Siblings ordered leaf-to-root; exactly `D` entries.
    pub path: Vec<FieldElement>,
    /// Root of the tree the proof was extracted from.
    pub root: FieldElement,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless tree builder and verifier over a hash oracle.
///
/// Every call rebuilds from its inputs; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct MerkleEngine<H> {
    oracle: H,
    config: EngineConfig,
}

impl<H: HashOracle> MerkleEngine<H> {
    /// Create an engine. Fails if the configured depth is out of range.
    pub fn new(oracle: H, config: EngineConfig) -> Result<Self, MerkleError> {
        config.validate()?;
        Ok(Self { oracle, config })
    }

    /// Create an engine at the circuit depth `MERKLE_PATH_LEN`.
    pub fn with_default_depth(oracle: H) -> Self {
        Self {
            oracle,
            config: EngineConfig::default(),
        }
    }

    pub fn depth(&self) -> usize {
        self.config.depth
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    pub fn oracle(&self) -> &H {
        &self.oracle
    }

    /// Commitment to one record. Field order is fixed.
    pub fn leaf_commitment(&self, record: &LeafRecord) -> Result<FieldElement, MerkleError> {
        let ancestor = encode(&record.ancestor_id)?;
        let relation = encode(&record.relation)?;
        let descendant = encode(&record.descendant_id)?;
        Ok(self.oracle.hash3(&ancestor, &relation, &descendant)?)
    }

    /// Padding leaf for slot `position`.
    pub fn padding_leaf(&self, position: usize) -> Result<FieldElement, MerkleError> {
        let sentinel = encode(PADDING_SENTINEL)?;
        let slot = encode(&position.to_string())?;
        Ok(self.oracle.hash3(&sentinel, &sentinel, &slot)?)
    }

    /// Commit to `records` in order and build every level.
    pub fn build_tree(&self, records: &[LeafRecord]) -> Result<MerkleTree, MerkleError> {
        let capacity = self.capacity();
        if records.len() > capacity {
            tracing::error!(
                records = records.len(),
                capacity,
                "record set exceeds tree capacity"
            );
            return Err(MerkleError::CapacityExceeded {
                records: records.len(),
                capacity,
            });
        }

        let mut leaves = Vec::with_capacity(capacity);
        for record in records {
            leaves.push(self.leaf_commitment(record)?);
        }
        while leaves.len() < capacity {
            let position = leaves.len();
            leaves.push(self.padding_leaf(position)?);
        }

        let mut levels = Vec::with_capacity(self.depth() + 1);
        levels.push(leaves);
        for _ in 0..self.depth() {
            let below = &levels[levels.len() - 1];
            let mut next = Vec::with_capacity(below.len() / 2);
            for pair in below.chunks_exact(2) {
                next.push(self.oracle.hash2(&pair[0], &pair[1])?);
            }
            levels.push(next);
        }
        Ok(MerkleTree { levels })
    }

    /// Build a membership proof for `query` over the full record set.
    ///
    /// Records are expected to be well formed; filtering happens before the
    /// engine is called.
    pub fn build_proof(
        &self,
        records: &[LeafRecord],
        query: &LeafRecord,
    ) -> Result<MerkleProof, MerkleError> {
        let tree = self.build_tree(records)?;
        let leaf = self.leaf_commitment(query)?;
        let index = tree
            .position_of(&leaf)
            .ok_or_else(|| MerkleError::LeafNotFound(query.to_string()))?;

        let path = tree.authentication_path(index)?;
        if path.len() != self.depth() {
            tracing::error!(expected = self.depth(), actual = path.len(), "bad path length");
            return Err(MerkleError::BadPathLength {
                expected: self.depth(),
                actual: path.len(),
            });
        }

        let root = tree.root();
        let leaf_index = index as u64;
        let computed = self.compute_root_from_proof(&leaf, &path, leaf_index)?;
        if computed != root {
            tracing::error!(%computed, %root, leaf_index, "proof does not reproduce tree root");
            return Err(MerkleError::SelfCheckFailed {
                computed: computed.to_hex(),
                expected: root.to_hex(),
            });
        }

        tracing::debug!(leaf_index, %leaf, %root, records = records.len(), "built merkle proof");
        Ok(MerkleProof {
            leaf_index,
            leaf,
            path,
            root,
        })
    }

    /// Fold `path` onto `leaf` using the bits of `index`.
    pub fn compute_root_from_proof(
        &self,
        leaf: &FieldElement,
        path: &[FieldElement],
        index: u64,
    ) -> Result<FieldElement, MerkleError> {
        if path.len() != self.depth() {
            tracing::error!(expected = self.depth(), actual = path.len(), "bad path length");
            return Err(MerkleError::BadPathLength {
                expected: self.depth(),
                actual: path.len(),
            });
        }
        let capacity = self.capacity() as u64;
        if index >= capacity {
            return Err(MerkleError::IndexOutOfRange { index, capacity });
        }

        let mut cur = *leaf;
        for (k, sibling) in path.iter().enumerate() {
            cur = if (index >> k) & 1 == 1 {
                self.oracle.hash2(sibling, &cur)?
            } else {
                self.oracle.hash2(&cur, sibling)?
            };
        }
        Ok(cur)
    }

    /// Whether `leaf` at `index` with `path` reproduces `root`.
    ///
    /// A path of the wrong length is an error. An index outside the tree is
    /// simply not a member.
    pub fn verify(
        &self,
        leaf: &FieldElement,
        path: &[FieldElement],
        root: &FieldElement,
        index: u64,
    ) -> Result<bool, MerkleError> {
        match self.compute_root_from_proof(leaf, path, index) {
            Ok(computed) => Ok(computed == *root),
            Err(MerkleError::IndexOutOfRange { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Verify `leaf` against the path, index, and root carried by `proof`.
pub fn verify_proof<H: HashOracle>(
    engine: &MerkleEngine<H>,
    leaf: &FieldElement,
    proof: &MerkleProof,
) -> Result<bool, MerkleError> {
    engine.verify(leaf, &proof.path, &proof.root, proof.leaf_index)
}
