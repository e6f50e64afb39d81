//! Engine configuration: scoring and matching policies.

use devtrust_core::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::fingerprint::MatchPolicy;
use crate::scoring::ScoringPolicy;

/// Configuration for the trust and identity engine.
///
/// Every field has a default, so an empty or partial file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Trust score calculator tunables.
    pub scoring: ScoringPolicy,

    /// Fingerprint matcher tunables.
    pub matching: MatchPolicy,
}

impl EngineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)
                .map_err(|e| RegistryError::Config(format!("failed to parse {}: {e}", path.display())))
        } else {
            Ok(Self::default())
        }
    }

    /// Write config as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| RegistryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config location: `<config_dir>/devtrust/engine.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("devtrust").join("engine.toml"))
    }
}
