//! Command implementations.

pub mod config;
pub mod hash;
pub mod identify;
pub mod register;
pub mod score;
pub mod verify;

use anyhow::{Context as _, Result};
use devtrust_engine::{EngineConfig, MemoryStore};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective engine configuration
    pub config: EngineConfig,

    /// Where the configuration was (or would be) loaded from
    pub config_path: Option<PathBuf>,

    /// Output format
    pub output_format: OutputFormat,
}

/// Read and parse a JSON input file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Write a store back to its snapshot file.
pub(crate) async fn save_snapshot(store: &MemoryStore, path: &Path) -> Result<()> {
    let snapshot = store.snapshot().await;
    let content = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
