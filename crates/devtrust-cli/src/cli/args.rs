//! Command-line argument definitions using clap.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use devtrust_core::DeviceIdentifier;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Trust scores and fingerprint matching for a used-device registry
///
/// Reads device histories, fingerprints and registry snapshots as JSON.
#[derive(Parser, Debug)]
#[command(name = "devtrust")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Engine config file (defaults to the platform config directory)
    #[arg(short, long, env = "DEVTRUST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the trust score for a device history
    Score(ScoreArgs),

    /// Match a fingerprint against a registry snapshot
    #[command(name = "match")]
    Match(MatchArgs),

    /// Print the canonical hash of a fingerprint
    Hash(HashArgs),

    /// Verify a device: trust score, delta, match verdict and confidence
    Verify(VerifyArgs),

    /// Store a fingerprint for a device in a registry snapshot
    Register(RegisterArgs),

    /// Manage engine configuration
    Config(ConfigArgs),
}

// ============================================================================
// Score command
// ============================================================================

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Device history JSON file
    pub history: PathBuf,

    /// Score as of this RFC 3339 timestamp instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

// ============================================================================
// Identifier options (shared by match and verify)
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct IdentifierArgs {
    /// Serial number read from the device
    #[arg(long, conflicts_with = "imei")]
    pub serial: Option<String>,

    /// IMEI read from the device
    #[arg(long)]
    pub imei: Option<String>,
}

impl IdentifierArgs {
    pub fn identifier(&self) -> Option<DeviceIdentifier> {
        self.serial
            .clone()
            .map(DeviceIdentifier::SerialNumber)
            .or_else(|| self.imei.clone().map(DeviceIdentifier::Imei))
    }
}

// ============================================================================
// Match command
// ============================================================================

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Fingerprint JSON file
    pub fingerprint: PathBuf,

    /// Registry snapshot to match against
    #[arg(long)]
    pub catalog: PathBuf,

    /// Look up this hash instead of the fingerprint's own
    #[arg(long)]
    pub hash: Option<String>,

    #[command(flatten)]
    pub identifier: IdentifierArgs,
}

// ============================================================================
// Hash command
// ============================================================================

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Fingerprint JSON file
    pub fingerprint: PathBuf,
}

// ============================================================================
// Verify command
// ============================================================================

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Device to verify
    pub device_id: String,

    /// Registry snapshot holding the device
    #[arg(long)]
    pub store: PathBuf,

    /// Fingerprint read from the physical device
    #[arg(long)]
    pub fingerprint: Option<PathBuf>,

    #[command(flatten)]
    pub identifier: IdentifierArgs,

    /// Verify as of this RFC 3339 timestamp instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Write the persisted trust score back to the snapshot
    #[arg(long)]
    pub save: bool,
}

// ============================================================================
// Register command
// ============================================================================

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Device to register the fingerprint for
    pub device_id: String,

    /// Fingerprint JSON file
    pub fingerprint: PathBuf,

    /// Registry snapshot to update in place
    #[arg(long)]
    pub store: PathBuf,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the config file path
    Path,
}
