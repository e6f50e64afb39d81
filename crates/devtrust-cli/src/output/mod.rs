//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use devtrust_core::{MatchCandidate, MatchType, RiskCategory, Verdict};
use serde::{Deserialize, Serialize};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl OutputFormat {
    /// Serialize `value` for the machine-readable formats.
    ///
    /// Returns `None` for [`OutputFormat::Pretty`]; the caller prints its own view.
    pub fn render<T: Serialize>(self, value: &T) -> Result<Option<String>> {
        match self {
            Self::Pretty => Ok(None),
            Self::Json => Ok(Some(serde_json::to_string_pretty(value)?)),
            Self::Yaml => Ok(Some(serde_yaml::to_string(value)?)),
        }
    }
}

/// Risk category colored by severity.
pub fn risk(category: RiskCategory) -> ColoredString {
    let label = category.to_string().to_uppercase();
    match category {
        RiskCategory::Low => label.green().bold(),
        RiskCategory::Medium => label.yellow().bold(),
        RiskCategory::High => label.red().bold(),
    }
}

/// Verdict colored by outcome.
pub fn verdict(verdict: Verdict) -> ColoredString {
    let label = verdict.to_string();
    match verdict {
        Verdict::Verified => label.green().bold(),
        Verdict::Suspicious => label.yellow().bold(),
        Verdict::NotFound => label.red().bold(),
    }
}

/// Twenty-cell bar for a 0..=100 score.
pub fn score_bar(score: u8) -> String {
    let filled = usize::from(score.min(100) / 5);
    format!("{}{}", "█".repeat(filled), "░".repeat(20 - filled))
}

/// Print ranked candidates, one per line.
pub fn print_candidates(candidates: &[MatchCandidate]) {
    if candidates.is_empty() {
        println!("  {}", "(no candidates)".dimmed());
        return;
    }
    for (rank, candidate) in candidates.iter().enumerate() {
        let kind = match candidate.match_type {
            MatchType::Exact => candidate.match_type.to_string().green(),
            MatchType::Partial => candidate.match_type.to_string().yellow(),
            MatchType::None => candidate.match_type.to_string().dimmed(),
        };
        let components: Vec<&str> = candidate.matched_components.iter().map(String::as_str).collect();
        println!(
            "  {}. {:<24} {:>3}  {:<8} {}",
            rank + 1,
            candidate.device_id.cyan(),
            candidate.match_score,
            kind,
            components.join(", ").dimmed()
        );
    }
}
