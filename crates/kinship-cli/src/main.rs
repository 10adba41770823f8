//! # kinship CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kinship_cli::encode::{run_encode, EncodeArgs};
use kinship_cli::lineage::{
    run_lineage, run_lineage_proof, run_treatment_proof, LineageArgs, LineageProofArgs,
    TreatmentProofArgs,
};
use kinship_cli::submit::{run_submit, SubmitArgs};
use kinship_cli::tree::{run_prove, run_verify, ProveArgs, VerifyArgs};

/// Kinship: Merkle commitments over lineage records.
#[derive(Parser, Debug)]
#[command(name = "kinship", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode strings to field elements.
    Encode(EncodeArgs),

    /// Build a membership proof over a records file.
    Prove(ProveArgs),

    /// Re-verify a proof request locally.
    Verify(VerifyArgs),

    /// Resolve a member's ancestor chain and siblings.
    Lineage(LineageArgs),

    /// Prepare a proof request for a member or group identifier.
    LineageProof(LineageProofArgs),

    /// Prepare a proof request for a (descendant, relation) pair.
    TreatmentProof(TreatmentProofArgs),

    /// Send a proof request to the external prover.
    Submit(SubmitArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v.
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json {
        builder.json().init();
    } else {
        builder.init();
    }

    let result = match cli.command {
        Commands::Encode(args) => run_encode(&args),
        Commands::Prove(args) => run_prove(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Lineage(args) => run_lineage(&args),
        Commands::LineageProof(args) => run_lineage_proof(&args),
        Commands::TreatmentProof(args) => run_treatment_proof(&args),
        Commands::Submit(args) => run_submit(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
