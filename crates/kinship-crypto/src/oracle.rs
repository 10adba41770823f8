//! # Hash Oracle (Sealed)
//!
//! Two- and three-input hashing over the BLS12-381 scalar field. Merkle nodes
//! use the arity-2 primitive, leaf commitments the arity-3 one.
//!
//! ## Sealed Trait
//!
//! [`HashOracle`] is sealed: only implementations in this crate can exist.
//! The engine's roots are only meaningful if they match what the proving
//! circuit computes, so an arbitrary external hash cannot be plugged in.
//!
//! ## Setup
//!
//! Poseidon round constants are generated once in
//! [`PoseidonOracle::new`]. A constructed oracle is always ready; there is
//! no separate initialisation step to forget.

use blstrs::Scalar as Fr;
use kinship_core::FieldElement;
use neptune::poseidon::{Poseidon, PoseidonConstants};
use std::sync::Arc;
use typenum::{U2, U3};

use crate::error::OracleError;

mod private {
    /// Sealing marker trait. Not accessible outside `kinship-crypto`.
    pub trait Sealed {}
}

/// Sealed interface to the circuit's hash primitive.
///
/// Implementations are immutable after construction and may be shared
/// across threads.
pub trait HashOracle: private::Sealed + Send + Sync {
    /// Hash two field elements (Merkle internal nodes).
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, OracleError>;

    /// Hash three field elements (leaf commitments).
    fn hash3(
        &self,
        a: &FieldElement,
        b: &FieldElement,
        c: &FieldElement,
    ) -> Result<FieldElement, OracleError>;
}

/// Poseidon over BLS12-381 with neptune's default constants.
pub struct PoseidonOracle {
    arity2: PoseidonConstants<Fr, U2>,
    arity3: PoseidonConstants<Fr, U3>,
}

impl PoseidonOracle {
    /// Generate the arity-2 and arity-3 round constants.
    pub fn new() -> Self {
        tracing::debug!("generating poseidon constants for arity 2 and 3");
        Self {
            arity2: PoseidonConstants::<Fr, U2>::new(),
            arity3: PoseidonConstants::<Fr, U3>::new(),
        }
    }
}

impl Default for PoseidonOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PoseidonOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoseidonOracle").finish_non_exhaustive()
    }
}

fn to_scalar(fe: &FieldElement) -> Result<Fr, OracleError> {
    Option::<Fr>::from(Fr::from_bytes_be(fe.as_bytes()))
        .ok_or_else(|| OracleError::Conversion(fe.to_hex()))
}

fn from_scalar(fr: Fr) -> Result<FieldElement, OracleError> {
    FieldElement::from_be_bytes(fr.to_bytes_be())
        .map_err(|e| OracleError::Conversion(e.to_string()))
}

impl private::Sealed for PoseidonOracle {}
impl<T: HashOracle> private::Sealed for &T {}
impl<T: HashOracle> private::Sealed for Arc<T> {}

impl HashOracle for PoseidonOracle {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, OracleError> {
        let mut sponge = Poseidon::new(&self.arity2);
        for fe in [a, b] {
            sponge
                .input(to_scalar(fe)?)
                .map_err(|e| OracleError::Absorb(format!("{e:?}")))?;
        }
        from_scalar(sponge.hash())
    }

    fn hash3(
        &self,
        a: &FieldElement,
        b: &FieldElement,
        c: &FieldElement,
    ) -> Result<FieldElement, OracleError> {
        let mut sponge = Poseidon::new(&self.arity3);
        for fe in [a, b, c] {
            sponge
                .input(to_scalar(fe)?)
                .map_err(|e| OracleError::Absorb(format!("{e:?}")))?;
        }
        from_scalar(sponge.hash())
    }
}

impl<T: HashOracle> HashOracle for &T {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, OracleError> {
        (**self).hash2(a, b)
    }

    fn hash3(
        &self,
        a: &FieldElement,
        b: &FieldElement,
        c: &FieldElement,
    ) -> Result<FieldElement, OracleError> {
        (**self).hash3(a, b, c)
    }
}

impl<T: HashOracle> HashOracle for Arc<T> {
    fn hash2(&self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement, OracleError> {
        (**self).hash2(a, b)
    }

    fn hash3(
        &self,
        a: &FieldElement,
        b: &FieldElement,
        c: &FieldElement,
    ) -> Result<FieldElement, OracleError> {
        (**self).hash3(a, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(n: u64) -> FieldElement {
        FieldElement::from_u64(n)
    }

    #[test]
    fn hash2_is_deterministic_across_instances() {
        let a = PoseidonOracle::new();
        let b = PoseidonOracle::new();
        assert_eq!(
            a.hash2(&fe(1), &fe(2)).unwrap(),
            b.hash2(&fe(1), &fe(2)).unwrap()
        );
    }

    #[test]
    fn hash2_is_order_sensitive() {
        let oracle = PoseidonOracle::new();
        assert_ne!(
            oracle.hash2(&fe(1), &fe(2)).unwrap(),
            oracle.hash2(&fe(2), &fe(1)).unwrap()
        );
    }

    #[test]
    fn arities_are_domain_separated() {
        let oracle = PoseidonOracle::new();
        let two = oracle.hash2(&fe(1), &fe(2)).unwrap();
        let three = oracle.hash3(&fe(1), &fe(2), &FieldElement::ZERO).unwrap();
        assert_ne!(two, three);
    }

    #[test]
    fn hash3_is_order_sensitive() {
        let oracle = PoseidonOracle::new();
        assert_ne!(
            oracle.hash3(&fe(1), &fe(2), &fe(3)).unwrap(),
            oracle.hash3(&fe(3), &fe(2), &fe(1)).unwrap()
        );
    }

    #[test]
    fn shared_handles_delegate() {
        let oracle = Arc::new(PoseidonOracle::new());
        let direct = oracle.hash2(&fe(4), &fe(5)).unwrap();
        assert_eq!((&*oracle).hash2(&fe(4), &fe(5)).unwrap(), direct);
        assert_eq!(HashOracle::hash2(&oracle, &fe(4), &fe(5)).unwrap(), direct);
    }

    #[test]
    fn oracle_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PoseidonOracle>();
    }
}
