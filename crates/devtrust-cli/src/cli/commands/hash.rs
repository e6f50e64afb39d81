//! `devtrust hash` - Canonical fingerprint hash.

use anyhow::Result;
use devtrust_core::DeviceFingerprint;
use devtrust_engine::fingerprint_hash;
use serde::Serialize;

use super::{read_json, Context};
use crate::cli::args::HashArgs;

#[derive(Serialize)]
struct HashOutput {
    fingerprint_hash: String,
}

pub fn execute(ctx: &Context, args: &HashArgs) -> Result<()> {
    let fingerprint: DeviceFingerprint = read_json(&args.fingerprint)?;
    let hash = fingerprint_hash(&fingerprint);

    match ctx.output_format.render(&HashOutput {
        fingerprint_hash: hash.clone(),
    })? {
        Some(rendered) => println!("{rendered}"),
        None => println!("{hash}"),
    }
    Ok(())
}
