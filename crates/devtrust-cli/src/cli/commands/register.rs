//! `devtrust register` - Store a device's fingerprint.

use anyhow::Result;
use colored::Colorize;
use devtrust_core::DeviceFingerprint;
use devtrust_engine::{MemoryStore, Verifier};
use serde::Serialize;
use std::sync::Arc;

use super::{read_json, save_snapshot, Context};
use crate::cli::args::RegisterArgs;

#[derive(Serialize)]
struct RegisterOutput<'a> {
    device_id: &'a str,
    fingerprint_hash: String,
}

pub async fn execute(ctx: &Context, args: &RegisterArgs) -> Result<()> {
    let fingerprint: DeviceFingerprint = read_json(&args.fingerprint)?;
    let store = Arc::new(MemoryStore::load(&args.store)?);

    let verifier = Verifier::new(Arc::clone(&store), &ctx.config);
    let hash = verifier.register_fingerprint(&args.device_id, &fingerprint).await?;
    save_snapshot(&store, &args.store).await?;

    let result = RegisterOutput {
        device_id: &args.device_id,
        fingerprint_hash: hash,
    };
    if let Some(rendered) = ctx.output_format.render(&result)? {
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "{} fingerprint registered for {}.",
        "Success:".green().bold(),
        result.device_id.cyan()
    );
    println!("{} {}", "Hash:".bold(), result.fingerprint_hash.dimmed());
    Ok(())
}
