//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::{Context as _, Result};
use args::{Cli, Commands};
use clap::Parser;
use devtrust_engine::EngineConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Explicit path, then the platform default
    let config_path = cli.config.clone().or_else(EngineConfig::default_path);
    let config = match &config_path {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let output_format = cli.output.unwrap_or(OutputFormat::Pretty);
    debug!(
        config = ?config_path.as_ref().map(|p| p.display().to_string()),
        output = %output_format,
        "cli initialized"
    );

    let ctx = commands::Context {
        config,
        config_path,
        output_format,
    };

    match cli.command {
        Commands::Score(args) => commands::score::execute(&ctx, &args),
        Commands::Match(args) => commands::identify::execute(&ctx, &args).await,
        Commands::Hash(args) => commands::hash::execute(&ctx, &args),
        Commands::Verify(args) => commands::verify::execute(&ctx, &args).await,
        Commands::Register(args) => commands::register::execute(&ctx, &args).await,
        Commands::Config(args) => commands::config::execute(&ctx, &args),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `debug` with `--verbose`, `warn` without.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
