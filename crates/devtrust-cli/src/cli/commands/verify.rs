//! `devtrust verify` - Full verification of a registered device.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use devtrust_core::DeviceFingerprint;
use devtrust_engine::{MemoryStore, VerificationRequest, Verifier};
use std::sync::Arc;

use super::{read_json, save_snapshot, Context};
use crate::cli::args::VerifyArgs;
use crate::output;

pub async fn execute(ctx: &Context, args: &VerifyArgs) -> Result<()> {
    let store = Arc::new(MemoryStore::load(&args.store)?);

    let mut request = VerificationRequest::new(args.device_id.clone());
    if let Some(path) = &args.fingerprint {
        let fingerprint: DeviceFingerprint = read_json(path)?;
        request = request.with_fingerprint(fingerprint);
    }
    if let Some(identifier) = args.identifier.identifier() {
        request = request.with_identifier(identifier);
    }

    let verifier = Verifier::new(Arc::clone(&store), &ctx.config);
    let report = verifier.verify_at(&request, args.at.unwrap_or_else(Utc::now)).await?;

    if args.save {
        save_snapshot(&store, &args.store).await?;
    }

    if let Some(rendered) = ctx.output_format.render(&report)? {
        println!("{rendered}");
        return Ok(());
    }

    println!("{} {}", "Device:".bold(), report.device_id.cyan());
    println!(
        "{} {}/100  {}",
        "Trust score:".bold(),
        report.trust.score.to_string().cyan().bold(),
        output::risk(report.trust.risk_category)
    );
    println!("  {}", output::score_bar(report.trust.score));
    if let Some(delta) = report.score_delta {
        let delta = format!("{delta:+}");
        let delta = if delta.starts_with('-') { delta.red() } else { delta.green() };
        println!("{} {}", "Change since last score:".bold(), delta);
    }
    for line in report.trust.explain() {
        println!("  {}", line.dimmed());
    }

    if let Some(verdict) = report.verdict {
        println!();
        println!("{} {}", "Verdict:".bold(), output::verdict(verdict));
        output::print_candidates(&report.candidates);
    }

    println!();
    println!("{} {}%", "Confidence:".bold(), report.confidence);
    if args.save {
        println!("{} {}", "Saved:".dimmed(), args.store.display());
    }

    Ok(())
}
