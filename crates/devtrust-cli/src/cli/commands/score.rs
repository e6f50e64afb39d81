//! `devtrust score` - Trust score for a device history.

use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use devtrust_core::DeviceHistory;
use devtrust_engine::calculate_at;

use super::{read_json, Context};
use crate::cli::args::ScoreArgs;
use crate::output;

pub fn execute(ctx: &Context, args: &ScoreArgs) -> Result<()> {
    let history: DeviceHistory = read_json(&args.history)?;
    let now = args.at.unwrap_or_else(Utc::now);
    let result = calculate_at(&history, &ctx.config.scoring, now);

    if let Some(rendered) = ctx.output_format.render(&result)? {
        println!("{rendered}");
        return Ok(());
    }

    println!(
        "{} {}/100  {}",
        "Trust score:".bold(),
        result.score.to_string().cyan().bold(),
        output::risk(result.risk_category)
    );
    println!("  {}", output::score_bar(result.score));
    println!();
    println!("{}", "Breakdown:".bold());
    for line in result.explain() {
        println!("  {line}");
    }
    println!();
    println!(
        "{} {}  {} {}  {} {}",
        "Owners:".dimmed(),
        history.ownership_records.len(),
        "Events:".dimmed(),
        history.events.len(),
        "Disputes:".dimmed(),
        history.disputes.len()
    );
    println!("{} {}", "Calculated at:".dimmed(), result.calculated_at.to_rfc3339());

    Ok(())
}
