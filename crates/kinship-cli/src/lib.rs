//! # kinship-cli — Command-Line Interface
//!
//! Provides the `kinship` binary.
//!
//! ## Subcommands
//!
//! - `kinship encode`: Field encoding of identifier strings.
//! - `kinship prove` / `kinship verify`: Merkle proofs over a records file.
//! - `kinship lineage`: Ancestor chain and siblings from a store snapshot.
//! - `kinship lineage-proof` / `kinship treatment-proof`: Proof requests
//!   from a store snapshot.
//! - `kinship submit`: Send a proof request to the external prover.
//!
//! ```bash
//! kinship encode Alice son
//! kinship prove --records records.yaml --ancestor H1 --relation Burn --descendant P1
//! kinship treatment-proof --store clinic.json --family clinical --descendant P1 --relation Burn
//! KINSHIP_PROVER_URL=http://localhost:8080 kinship submit --request proof.json
//! ```
//!
//! Input files are JSON or YAML; the format is chosen by extension.

pub mod encode;
pub mod lineage;
pub mod submit;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};
use kinship_crypto::{EngineConfig, MerkleEngine, PoseidonOracle};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read a JSON or YAML document. `.yaml` and `.yml` parse as YAML; anything
/// else as JSON.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    if is_yaml(path) {
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse JSON: {}", path.display()))
    }
}

pub fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{out}");
    Ok(())
}

/// Write a value as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("failed to render output")?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Engine over the Poseidon oracle. `depth` overrides `KINSHIP_MERKLE_DEPTH`.
pub fn engine(depth: Option<usize>) -> Result<MerkleEngine<PoseidonOracle>> {
    let mut config = EngineConfig::from_env();
    if let Some(depth) = depth {
        config.depth = depth;
    }
    MerkleEngine::new(PoseidonOracle::new(), config).context("invalid engine configuration")
}
