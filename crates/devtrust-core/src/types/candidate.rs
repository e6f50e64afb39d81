//! Match candidates and the verdict derived from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How strongly a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Score reached the exact threshold for its path
    Exact,
    /// Above the floor but below the exact threshold
    Partial,
    /// No usable match
    None,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Partial => write!(f, "partial"),
            Self::None => write!(f, "none"),
        }
    }
}

/// A scored guess that a submitted fingerprint belongs to a catalogued device.
///
/// Built fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub device_id: String,
    /// 0..=100
    pub match_score: u8,
    pub match_type: MatchType,
    /// Labels of the signals that contributed points
    pub matched_components: BTreeSet<String>,
}

/// Overall outcome of a verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Best candidate scored high enough to confirm identity
    Verified,
    /// A plausible candidate exists but identity is not confirmed
    Suspicious,
    /// Nothing matched
    NotFound,
}

impl Verdict {
    /// Derive a verdict from the best candidate's score.
    #[must_use]
    pub const fn from_best_score(best: Option<u8>, verified_min: u8, suspicious_min: u8) -> Self {
        match best {
            Some(score) if score >= verified_min => Self::Verified,
            Some(score) if score >= suspicious_min => Self::Suspicious,
            _ => Self::NotFound,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Verified => write!(f, "verified"),
            Self::Suspicious => write!(f, "suspicious"),
            Self::NotFound => write!(f, "not_found"),
        }
    }
}
