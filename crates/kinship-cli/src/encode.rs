//! # Encode Subcommand
//!
//! Prints the field element each input string encodes to.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

/// Arguments for `kinship encode`.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Strings to encode.
    #[arg(required = true, value_name = "TEXT")]
    pub inputs: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Encoded<'a> {
    input: &'a str,
    element: String,
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    let mut out = Vec::with_capacity(args.inputs.len());
    for input in &args.inputs {
        let element = kinship_crypto::encode(input)?;
        out.push(Encoded {
            input,
            element: element.to_hex(),
        });
    }
    crate::print_json(&out)?;
    Ok(0)
}
