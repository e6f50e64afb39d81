//! `devtrust match` - Rank catalogued devices against a fingerprint.

use anyhow::Result;
use colored::Colorize;
use devtrust_core::{DeviceFingerprint, MatchCandidate, Verdict};
use devtrust_engine::{DeviceStore, Matcher, MemoryStore, Probe};
use serde::Serialize;

use super::{read_json, Context};
use crate::cli::args::MatchArgs;
use crate::output;

#[derive(Serialize)]
struct MatchOutput {
    fingerprint_hash: Option<String>,
    catalog_size: usize,
    candidates: Vec<MatchCandidate>,
    verdict: Verdict,
}

pub async fn execute(ctx: &Context, args: &MatchArgs) -> Result<()> {
    let fingerprint: DeviceFingerprint = read_json(&args.fingerprint)?;
    let store = MemoryStore::load(&args.catalog)?;
    let catalog = store.load_fingerprint_catalog().await?;

    let mut probe = Probe::fingerprint(fingerprint);
    if let Some(hash) = &args.hash {
        probe = probe.with_hash(hash.clone());
    }
    if let Some(identifier) = args.identifier.identifier() {
        probe = probe.with_identifier(identifier);
    }
    let probe = probe.with_computed_hash();

    let matcher = Matcher::new(ctx.config.matching.clone());
    let catalog_size = catalog.len();
    let candidates = matcher.rank_concurrent(&probe, catalog).await;
    let result = MatchOutput {
        fingerprint_hash: probe.fingerprint_hash.clone(),
        catalog_size,
        verdict: matcher.verdict(&candidates),
        candidates,
    };

    if let Some(rendered) = ctx.output_format.render(&result)? {
        println!("{rendered}");
        return Ok(());
    }

    println!("{} {}", "Verdict:".bold(), output::verdict(result.verdict));
    if let Some(hash) = &result.fingerprint_hash {
        println!("{} {}", "Hash:".bold(), hash.dimmed());
    }
    println!();
    println!(
        "{} {} of {} catalogued",
        "Candidates:".bold(),
        result.candidates.len(),
        result.catalog_size
    );
    output::print_candidates(&result.candidates);

    Ok(())
}
