//! `devtrust config` - Engine configuration management.

use anyhow::{Context as _, Result};
use colored::Colorize;
use devtrust_engine::EngineConfig;
use std::path::PathBuf;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};

pub fn execute(ctx: &Context, args: &ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(ctx),
        ConfigCommands::Init { force } => init_config(ctx, force),
        ConfigCommands::Path => show_path(ctx),
    }
}

fn require_path(ctx: &Context) -> Result<&PathBuf> {
    ctx.config_path
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory; pass --config <PATH>"))
}

fn show_config(ctx: &Context) -> Result<()> {
    match ctx.output_format.render(&ctx.config)? {
        Some(rendered) => println!("{rendered}"),
        None => {
            let source = match &ctx.config_path {
                Some(path) if path.exists() => path.display().to_string(),
                _ => "(defaults)".to_string(),
            };
            println!("{} {}", "# source:".dimmed(), source.dimmed());
            println!("{}", toml::to_string_pretty(&ctx.config)?);
        }
    }
    Ok(())
}

fn init_config(ctx: &Context, force: bool) -> Result<()> {
    let path = require_path(ctx)?;
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    EngineConfig::default()
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("{} wrote {}", "Success:".green().bold(), path.display().to_string().cyan());
    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    println!("{}", require_path(ctx)?.display());
    Ok(())
}
