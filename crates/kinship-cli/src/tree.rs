//! # Prove and Verify Subcommands
//!
//! Merkle proofs over a plain records file, without a lineage store.
//! Malformed records in the file are skipped with a warning, exactly as the
//! resolver does for stored records.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kinship_core::LeafRecord;
use kinship_lineage::filter_leaf_records;
use kinship_zkp::ProofRequest;

/// Arguments for `kinship prove`.
#[derive(Args, Debug)]
pub struct ProveArgs {
    /// JSON or YAML list of `{ancestor_id, relation, descendant_id}`.
    #[arg(long, value_name = "FILE")]
    pub records: PathBuf,
    #[arg(long)]
    pub ancestor: String,
    #[arg(long)]
    pub relation: String,
    #[arg(long)]
    pub descendant: String,
    /// Tree depth; defaults to `KINSHIP_MERKLE_DEPTH` or 3.
    #[arg(long)]
    pub depth: Option<usize>,
    /// Write the proof request here instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for `kinship verify`.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// A proof request as produced by `prove`.
    #[arg(long, value_name = "FILE")]
    pub request: PathBuf,
    #[arg(long)]
    pub depth: Option<usize>,
}

/// Execute the prove subcommand.
pub fn run_prove(args: &ProveArgs) -> Result<u8> {
    let records: Vec<LeafRecord> = crate::read_document(&args.records)?;
    let records = filter_leaf_records(records);
    let query = LeafRecord::new(&args.ancestor, &args.relation, &args.descendant);

    let engine = crate::engine(args.depth)?;
    let proof = engine
        .build_proof(&records, &query)
        .with_context(|| format!("cannot prove {query}"))?;
    let request = ProofRequest::from_proof(&query, &proof);
    request.validate(engine.depth())?;

    match &args.output {
        Some(path) => {
            crate::write_json(path, &request)?;
            println!(
                "OK: proof for {query} at leaf {} written to {}",
                proof.leaf_index,
                path.display()
            );
        }
        None => crate::print_json(&request)?,
    }
    Ok(0)
}

/// Execute the verify subcommand. Exit code 1 when the proof does not hold.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let request: ProofRequest = crate::read_document(&args.request)?;
    let engine = crate::engine(args.depth)?;
    if request.verify_locally(&engine)? {
        println!(
            "OK: {} is committed under root {}",
            request.record(),
            request.merkle_root
        );
        Ok(0)
    } else {
        println!(
            "FAIL: {} does not reproduce root {}",
            request.record(),
            request.merkle_root
        );
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const RECORDS: &str = "\
- {ancestor_id: H1, relation: Burn, descendant_id: P1}
- {ancestor_id: H1, relation: Fracture, descendant_id: P2}
- {ancestor_id: '', relation: Flu, descendant_id: P9}
- {ancestor_id: H2, relation: Malaria, descendant_id: P3}
";

    fn prove_to_file(dir: &Path, relation: &str, descendant: &str) -> Result<PathBuf> {
        let records = dir.join("records.yaml");
        std::fs::write(&records, RECORDS)?;
        let output = dir.join("request.json");
        run_prove(&ProveArgs {
            records,
            ancestor: "H1".into(),
            relation: relation.into(),
            descendant: descendant.into(),
            depth: None,
            output: Some(output.clone()),
        })?;
        Ok(output)
    }

    #[test]
    fn prove_then_verify() {
        let dir = tempfile::tempdir().unwrap();
        let request = prove_to_file(dir.path(), "Fracture", "P2").unwrap();
        let parsed: ProofRequest = crate::read_document(&request).unwrap();
        assert_eq!(parsed.merkle_leaf_index, 1);
        assert_eq!(
            run_verify(&VerifyArgs {
                request,
                depth: None
            })
            .unwrap(),
            0
        );
    }

    #[test]
    fn tampered_request_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let request = prove_to_file(dir.path(), "Burn", "P1").unwrap();
        let mut parsed: ProofRequest = crate::read_document(&request).unwrap();
        parsed.relation = "Fracture".into();
        crate::write_json(&request, &parsed).unwrap();
        assert_eq!(
            run_verify(&VerifyArgs {
                request,
                depth: None
            })
            .unwrap(),
            1
        );
    }

    #[test]
    fn unknown_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = prove_to_file(dir.path(), "Flu", "P9").unwrap_err();
        assert!(format!("{err:#}").contains("cannot prove"));
    }

    #[test]
    fn verify_with_mismatched_depth_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let request = prove_to_file(dir.path(), "Burn", "P1").unwrap();
        assert!(run_verify(&VerifyArgs {
            request,
            depth: Some(4)
        })
        .is_err());
    }
}
