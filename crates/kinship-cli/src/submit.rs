//! # Submit Subcommand
//!
//! Sends a proof request to the external prover and optionally asks it to
//! verify the returned proof. The only subcommand that performs network I/O.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use kinship_core::FieldElement;
use kinship_crypto::EngineConfig;
use kinship_zkp::{ProofRequest, ProverClient, ProverConfig};

/// Arguments for `kinship submit`.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// A proof request as produced by `prove` or the `*-proof` commands.
    #[arg(long, value_name = "FILE")]
    pub request: PathBuf,
    /// Prover base URL; overrides `KINSHIP_PROVER_URL`.
    #[arg(long, value_name = "URL")]
    pub prover_url: Option<String>,
    /// Tree depth the prover's circuit expects.
    #[arg(long)]
    pub depth: Option<usize>,
    /// Also call the prover's verification endpoint on the returned proof.
    #[arg(long)]
    pub verify: bool,
}

/// Execute the submit subcommand.
pub fn run_submit(args: &SubmitArgs) -> Result<u8> {
    let request: ProofRequest = crate::read_document(&args.request)?;
    let config = match &args.prover_url {
        Some(url) => ProverConfig::new(url)?,
        None => ProverConfig::from_env()?,
    };
    let depth = args.depth.unwrap_or_else(|| EngineConfig::from_env().depth);
    tracing::debug!(prover = %config.base_url, depth, "submitting proof request");
    let client = ProverClient::new(config, depth)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(submit(&client, &request, args.verify))
}

async fn submit(client: &ProverClient, request: &ProofRequest, verify: bool) -> Result<u8> {
    let response = client.generate_proof(request).await?;

    let root = FieldElement::from_hex(&request.merkle_root)?;
    if !response.commits_to_root(&root) {
        bail!(
            "prover public inputs do not commit to root {}",
            request.merkle_root
        );
    }
    println!(
        "OK: proof of {} bytes for {}",
        response.proof.len(),
        request.record()
    );

    if !verify {
        crate::print_json(&response)?;
        return Ok(0);
    }

    let verdict = client.verify_proof(&response.to_verify_request()?).await?;
    if verdict.valid {
        println!("OK: prover accepted the proof");
        Ok(0)
    } else {
        println!("FAIL: prover rejected the proof: {}", verdict.message);
        Ok(1)
    }
}
