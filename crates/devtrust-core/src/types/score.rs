//! Trust score result and its component breakdown.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score that still counts as low risk.
pub const LOW_RISK_MIN_SCORE: u8 = 80;

/// Lowest score that still counts as medium risk.
pub const MEDIUM_RISK_MIN_SCORE: u8 = 50;

/// Coarse risk tier derived from the clamped trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    /// Score >= 80
    Low,
    /// 50 <= score < 80
    Medium,
    /// Score < 50
    High,
}

impl RiskCategory {
    /// Classify a score with the default cutoffs.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        Self::from_score_with(score, LOW_RISK_MIN_SCORE, MEDIUM_RISK_MIN_SCORE)
    }

    /// Classify a score with explicit cutoffs.
    #[must_use]
    pub const fn from_score_with(score: u8, low_min: u8, medium_min: u8) -> Self {
        if score >= low_min {
            Self::Low
        } else if score >= medium_min {
            Self::Medium
        } else {
            Self::High
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Per-component points behind a trust score.
///
/// Each component is bounded on its own; only the total is clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// Stable ownership, 0..=30
    pub ownership_continuity: i32,
    /// Verified registration/purchase/other events, 0..=25
    pub history_completeness: i32,
    /// Repair track record, 0..=20
    pub repair_history: i32,
    /// Decayed dispute penalties, <= 0 with no floor
    pub dispute_penalty: i32,
}

impl ScoreComponents {
    /// Sum of all four components, before the base offset.
    #[must_use]
    pub const fn sum(&self) -> i32 {
        self.ownership_continuity
            .saturating_add(self.history_completeness)
            .saturating_add(self.repair_history)
            .saturating_add(self.dispute_penalty)
    }
}

/// Computed trust score for one device. Also the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustScoreResult {
    /// Clamped total, 0..=100
    pub score: u8,
    /// Tier derived from `score`
    pub risk_category: RiskCategory,
    /// Breakdown that explains `score`
    pub components: ScoreComponents,
    /// When the score was computed
    pub calculated_at: DateTime<Utc>,
}

impl TrustScoreResult {
    /// Signed change relative to an earlier result.
    #[must_use]
    pub fn delta_from(&self, previous: &Self) -> i32 {
        i32::from(self.score) - i32::from(previous.score)
    }

    /// Human-readable breakdown, one line per component.
    #[must_use]
    pub fn explain(&self) -> Vec<String> {
        let c = &self.components;
        vec![
            format!("ownership continuity: {:+}", c.ownership_continuity),
            format!("history completeness: {:+}", c.history_completeness),
            format!("repair history:       {:+}", c.repair_history),
            format!("dispute penalty:      {:+}", c.dispute_penalty),
            format!("score: {} ({} risk)", self.score, self.risk_category),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_cutoffs() {
        assert_eq!(RiskCategory::from_score(100), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(80), RiskCategory::Low);
        assert_eq!(RiskCategory::from_score(79), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(50), RiskCategory::Medium);
        assert_eq!(RiskCategory::from_score(49), RiskCategory::High);
        assert_eq!(RiskCategory::from_score(0), RiskCategory::High);
    }

    #[test]
    fn serializes_wire_names() {
        let result = TrustScoreResult {
            score: 54,
            risk_category: RiskCategory::Medium,
            components: ScoreComponents {
                ownership_continuity: 3,
                history_completeness: 16,
                repair_history: 10,
                dispute_penalty: 0,
            },
            calculated_at: Utc::now(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["risk_category"], "medium");
        assert_eq!(json["components"]["history_completeness"], 16);
        assert_eq!(result.components.sum(), 29);
    }

    #[test]
    fn sum_saturates() {
        let components = ScoreComponents {
            ownership_continuity: i32::MAX,
            history_completeness: 25,
            repair_history: 20,
            dispute_penalty: 0,
        };
        assert_eq!(components.sum(), i32::MAX);

        let components = ScoreComponents {
            dispute_penalty: i32::MIN,
            ..ScoreComponents::default()
        };
        assert_eq!(components.sum(), i32::MIN);
    }

    #[test]
    fn delta_is_signed() {
        let now = Utc::now();
        let old = TrustScoreResult {
            score: 54,
            risk_category: RiskCategory::Medium,
            components: ScoreComponents::default(),
            calculated_at: now,
        };
        let new = TrustScoreResult {
            score: 29,
            risk_category: RiskCategory::High,
            ..old.clone()
        };
        assert_eq!(new.delta_from(&old), -25);
        assert_eq!(old.delta_from(&new), 25);
    }
}
