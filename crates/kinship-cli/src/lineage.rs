//! # Lineage Subcommands
//!
//! Resolution and proof preparation over a [`LineageSnapshot`] file. The
//! snapshot is loaded into an [`ArenaStore`]; every command runs the same
//! generic code for whichever family `--family` selects.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use kinship_lineage::{
    ArenaStore, Civil, Clinical, EntityFamily, Genealogy, LineageConfig, LineageResolver,
    LineageSnapshot,
};
use kinship_zkp::{PreparedProof, ProofPreparer};

/// Record family stored in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FamilyArg {
    /// Families and their relations.
    Genealogy,
    /// Countries and their citizens.
    Civil,
    /// Hospitals and their patients; the relation is the treatment.
    Clinical,
}

/// Options shared by every lineage subcommand.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Snapshot file (`{groups: [...], members: [...]}`), JSON or YAML.
    #[arg(long, value_name = "FILE")]
    pub store: PathBuf,
    #[arg(long, value_enum, default_value = "genealogy")]
    pub family: FamilyArg,
    /// Ancestors fetched per store round trip.
    #[arg(long)]
    pub eager_depth: Option<usize>,
    /// Maximum ancestor chain length.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for `kinship lineage`.
#[derive(Args, Debug)]
pub struct LineageArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Member or group public identifier.
    pub identifier: String,
}

/// Arguments for `kinship lineage-proof`.
#[derive(Args, Debug)]
pub struct LineageProofArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    /// Member or group public identifier.
    pub identifier: String,
    #[arg(long)]
    pub depth: Option<usize>,
    /// Write only the proof request here, ready for `submit`.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for `kinship treatment-proof`.
#[derive(Args, Debug)]
pub struct TreatmentProofArgs {
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(long)]
    pub descendant: String,
    /// Relationship, or treatment for the clinical family.
    #[arg(long)]
    pub relation: String,
    #[arg(long)]
    pub depth: Option<usize>,
    /// Write only the proof request here, ready for `submit`.
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

macro_rules! for_family {
    ($family:expr, $run:ident($($arg:expr),*)) => {
        match $family {
            FamilyArg::Genealogy => $run::<Genealogy>($($arg),*),
            FamilyArg::Civil => $run::<Civil>($($arg),*),
            FamilyArg::Clinical => $run::<Clinical>($($arg),*),
        }
    };
}

/// Execute `kinship lineage`.
pub fn run_lineage(args: &LineageArgs) -> Result<u8> {
    for_family!(args.store.family, lineage_for(args))
}

/// Execute `kinship lineage-proof`.
pub fn run_lineage_proof(args: &LineageProofArgs) -> Result<u8> {
    for_family!(args.store.family, lineage_proof_for(args))
}

/// Execute `kinship treatment-proof`.
pub fn run_treatment_proof(args: &TreatmentProofArgs) -> Result<u8> {
    for_family!(args.store.family, treatment_proof_for(args))
}

fn lineage_for<F: EntityFamily>(args: &LineageArgs) -> Result<u8> {
    let resolver = open_resolver::<F>(&args.store)?;
    let resolved = resolver
        .resolve_lineage(&args.identifier)
        .with_context(|| format!("cannot resolve {}", args.identifier))?;
    crate::print_json(&resolved)?;
    Ok(0)
}

fn lineage_proof_for<F: EntityFamily>(args: &LineageProofArgs) -> Result<u8> {
    let preparer = ProofPreparer::new(open_resolver::<F>(&args.store)?, crate::engine(args.depth)?);
    let prepared = preparer
        .prepare_lineage_proof(&args.identifier)
        .with_context(|| format!("cannot prepare proof for {}", args.identifier))?;
    emit(&prepared, args.output.as_deref())
}

fn treatment_proof_for<F: EntityFamily>(args: &TreatmentProofArgs) -> Result<u8> {
    let preparer = ProofPreparer::new(open_resolver::<F>(&args.store)?, crate::engine(args.depth)?);
    let prepared = preparer
        .prepare_treatment_proof(&args.descendant, &args.relation)
        .with_context(|| {
            format!(
                "cannot prepare proof for {} with {}",
                args.descendant, args.relation
            )
        })?;
    emit(&prepared, args.output.as_deref())
}

fn emit(prepared: &PreparedProof, output: Option<&Path>) -> Result<u8> {
    match output {
        Some(path) => {
            crate::write_json(path, &prepared.request)?;
            println!(
                "OK: proof for {} at leaf {} of {} written to {}",
                prepared.record,
                prepared.proof.leaf_index,
                prepared.leaf_count,
                path.display()
            );
        }
        None => crate::print_json(prepared)?,
    }
    Ok(0)
}

fn open_resolver<F: EntityFamily>(
    args: &StoreArgs,
) -> Result<LineageResolver<F, ArenaStore<F>>> {
    let store = ArenaStore::from_snapshot(load_snapshot::<F>(&args.store)?)
        .with_context(|| format!("inconsistent snapshot: {}", args.store.display()))?;
    tracing::debug!(
        family = F::NAME,
        groups = store.group_count(),
        members = store.member_count(),
        "loaded snapshot"
    );

    let mut config = LineageConfig::from_env();
    if let Some(eager) = args.eager_depth {
        config.eager_depth = eager;
    }
    if let Some(max) = args.max_depth {
        config.max_depth = max;
    }
    Ok(LineageResolver::new(store, config))
}

fn load_snapshot<F: EntityFamily>(path: &Path) -> Result<LineageSnapshot<F>> {
    crate::read_document(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLINIC: &str = r#"{
        "groups": [
            {"id": 1, "hospital_id": "H1", "name": "General"},
            {"id": 2, "hospital_id": null, "name": "Unlisted"}
        ],
        "members": [
            {"id": 10, "patient_id": "P1", "first_name": "Kofi", "treatment": "Burn", "hospital_id": 1},
            {"id": 11, "patient_id": "P2", "first_name": "Ama", "treatment": "Flu", "hospital_id": 2}
        ]
    }"#;

    const FAMILY: &str = "\
groups:
  - {id: 1, family_id: F1, name: Root}
  - {id: 2, family_id: F2, name: Branch, parent_id: 1}
members:
  - {id: 10, relation_id: R1, first_name: Yaw, relationship: son, family_id: 2}
";

    fn store_args(dir: &Path, name: &str, body: &str, family: FamilyArg) -> StoreArgs {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        StoreArgs {
            store: path,
            family,
            eager_depth: None,
            max_depth: None,
        }
    }

    #[test]
    fn treatment_proof_from_json_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let args = TreatmentProofArgs {
            store: store_args(dir.path(), "clinic.json", CLINIC, FamilyArg::Clinical),
            descendant: "P1".into(),
            relation: "Burn".into(),
            depth: None,
            output: None,
        };
        assert_eq!(run_treatment_proof(&args).unwrap(), 0);
    }

    #[test]
    fn unlisted_hospital_cannot_be_proven() {
        let dir = tempfile::tempdir().unwrap();
        let args = TreatmentProofArgs {
            store: store_args(dir.path(), "clinic.json", CLINIC, FamilyArg::Clinical),
            descendant: "P2".into(),
            relation: "Flu".into(),
            depth: None,
            output: None,
        };
        let err = run_treatment_proof(&args).unwrap_err();
        assert!(format!("{err:#}").contains("no public identifier"));
    }

    #[test]
    fn lineage_and_proof_from_yaml_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_args(dir.path(), "family.yaml", FAMILY, FamilyArg::Genealogy);
        assert_eq!(
            run_lineage(&LineageArgs {
                store: store.clone(),
                identifier: "R1".into(),
            })
            .unwrap(),
            0
        );
        assert_eq!(
            run_lineage_proof(&LineageProofArgs {
                store,
                identifier: "F1".into(),
                depth: None,
                output: None,
            })
            .unwrap(),
            0
        );
    }

    #[test]
    fn output_file_holds_the_bare_request() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("request.json");
        let args = LineageProofArgs {
            store: store_args(dir.path(), "family.yaml", FAMILY, FamilyArg::Genealogy),
            identifier: "R1".into(),
            depth: None,
            output: Some(output.clone()),
        };
        assert_eq!(run_lineage_proof(&args).unwrap(), 0);
        let request: kinship_zkp::ProofRequest = crate::read_document(&output).unwrap();
        assert_eq!(request.record(), kinship_core::LeafRecord::new("F2", "son", "R1"));
        assert_eq!(request.merkle_leaf_index, 0);
    }

    #[test]
    fn unknown_identifier_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_args(dir.path(), "family.yaml", FAMILY, FamilyArg::Genealogy);
        assert!(run_lineage(&LineageArgs {
            store,
            identifier: "nobody".into(),
        })
        .is_err());
    }

    #[test]
    fn wrong_family_fails_to_parse() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_args(dir.path(), "family.yaml", FAMILY, FamilyArg::Clinical);
        assert!(run_lineage(&LineageArgs {
            store,
            identifier: "R1".into(),
        })
        .is_err());
    }
}
