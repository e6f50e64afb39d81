//! Scoring constants and the configurable policy built from them.

use devtrust_core::types::score::{LOW_RISK_MIN_SCORE, MEDIUM_RISK_MIN_SCORE};
use devtrust_core::{ReportStatus, ReportType};
use serde::{Deserialize, Serialize};

/// Fixed offset added to the component sum before clamping.
pub const BASE_OFFSET: i32 = 25;

/// Days of stable ownership worth one continuity point.
pub const OWNERSHIP_PERIOD_DAYS: i64 = 30;
/// Cap on continuity points.
pub const OWNERSHIP_MAX_POINTS: i32 = 30;
/// Ownership records allowed before churn is penalized.
pub const CHURN_FREE_RECORDS: usize = 5;
/// Points lost per ownership record beyond `CHURN_FREE_RECORDS`.
pub const CHURN_PENALTY_PER_RECORD: i32 = 2;

/// Points per required event type present among verified events.
pub const REQUIRED_EVENT_POINTS: i32 = 8;
/// Points per verified event outside the required set.
pub const EXTRA_EVENT_POINTS: i32 = 3;
/// Cap on points from extra events.
pub const EXTRA_EVENT_MAX_POINTS: i32 = 9;

/// Repair score before any repair is folded in.
pub const REPAIR_NEUTRAL_POINTS: i32 = 10;
/// Added per verified repair.
pub const VERIFIED_REPAIR_POINTS: i32 = 2;
/// Subtracted per unverified repair.
pub const UNVERIFIED_REPAIR_PENALTY: i32 = 3;
/// Cap on the repair component.
pub const REPAIR_MAX_POINTS: i32 = 20;

/// Reports older than this many days start decaying.
pub const DECAY_AGED_AFTER_DAYS: i64 = 180;
/// Reports older than this many days decay further.
pub const DECAY_STALE_AFTER_DAYS: i64 = 365;
/// Multiplier for reports in `(180, 365]` days.
pub const DECAY_AGED_FACTOR: f64 = 0.7;
/// Multiplier for reports older than 365 days.
pub const DECAY_STALE_FACTOR: f64 = 0.5;

/// Penalties for one report type, by review status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyPair {
    pub verified: i32,
    pub unverified: i32,
}

/// Base penalty per `(report type, status)` cell. All values are <= 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputePenaltyTable {
    pub stolen: PenaltyPair,
    pub fraud: PenaltyPair,
    pub tampered: PenaltyPair,
    pub other: PenaltyPair,
}

impl Default for DisputePenaltyTable {
    fn default() -> Self {
        Self {
            stolen: PenaltyPair {
                verified: -25,
                unverified: -15,
            },
            fraud: PenaltyPair {
                verified: -20,
                unverified: -10,
            },
            tampered: PenaltyPair {
                verified: -15,
                unverified: -8,
            },
            other: PenaltyPair {
                verified: -10,
                unverified: -5,
            },
        }
    }
}

impl DisputePenaltyTable {
    /// Undecayed penalty for a report.
    #[must_use]
    pub const fn penalty(&self, report_type: ReportType, status: ReportStatus) -> i32 {
        let pair = match report_type {
            ReportType::Stolen => self.stolen,
            ReportType::Fraud => self.fraud,
            ReportType::Tampered => self.tampered,
            ReportType::Other => self.other,
        };
        match status {
            ReportStatus::Verified => pair.verified,
            ReportStatus::Unverified => pair.unverified,
        }
    }
}

/// Age-based decay applied to dispute penalties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputeDecay {
    pub aged_after_days: i64,
    pub stale_after_days: i64,
    pub aged_factor: f64,
    pub stale_factor: f64,
}

impl Default for DisputeDecay {
    fn default() -> Self {
        Self {
            aged_after_days: DECAY_AGED_AFTER_DAYS,
            stale_after_days: DECAY_STALE_AFTER_DAYS,
            aged_factor: DECAY_AGED_FACTOR,
            stale_factor: DECAY_STALE_FACTOR,
        }
    }
}

impl DisputeDecay {
    /// Multiplier for a report filed `days_since` days ago.
    #[must_use]
    pub fn factor(&self, days_since: i64) -> f64 {
        if days_since > self.stale_after_days {
            self.stale_factor
        } else if days_since > self.aged_after_days {
            self.aged_factor
        } else {
            1.0
        }
    }
}

/// Every tunable used by the trust score calculator.
///
/// Defaults reproduce the registry's reference scoring exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base_offset: i32,
    pub ownership_period_days: i64,
    pub ownership_max_points: i32,
    pub churn_free_records: usize,
    pub churn_penalty_per_record: i32,
    pub required_event_points: i32,
    pub extra_event_points: i32,
    pub extra_event_max_points: i32,
    pub repair_neutral_points: i32,
    pub verified_repair_points: i32,
    pub unverified_repair_penalty: i32,
    pub repair_max_points: i32,
    pub low_risk_min_score: u8,
    pub medium_risk_min_score: u8,
    pub penalties: DisputePenaltyTable,
    pub decay: DisputeDecay,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_offset: BASE_OFFSET,
            ownership_period_days: OWNERSHIP_PERIOD_DAYS,
            ownership_max_points: OWNERSHIP_MAX_POINTS,
            churn_free_records: CHURN_FREE_RECORDS,
            churn_penalty_per_record: CHURN_PENALTY_PER_RECORD,
            required_event_points: REQUIRED_EVENT_POINTS,
            extra_event_points: EXTRA_EVENT_POINTS,
            extra_event_max_points: EXTRA_EVENT_MAX_POINTS,
            repair_neutral_points: REPAIR_NEUTRAL_POINTS,
            verified_repair_points: VERIFIED_REPAIR_POINTS,
            unverified_repair_penalty: UNVERIFIED_REPAIR_PENALTY,
            repair_max_points: REPAIR_MAX_POINTS,
            low_risk_min_score: LOW_RISK_MIN_SCORE,
            medium_risk_min_score: MEDIUM_RISK_MIN_SCORE,
            penalties: DisputePenaltyTable::default(),
            decay: DisputeDecay::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_table_matches_reference() {
        let t = DisputePenaltyTable::default();
        assert_eq!(t.penalty(ReportType::Stolen, ReportStatus::Verified), -25);
        assert_eq!(t.penalty(ReportType::Stolen, ReportStatus::Unverified), -15);
        assert_eq!(t.penalty(ReportType::Fraud, ReportStatus::Verified), -20);
        assert_eq!(t.penalty(ReportType::Fraud, ReportStatus::Unverified), -10);
        assert_eq!(t.penalty(ReportType::Tampered, ReportStatus::Verified), -15);
        assert_eq!(t.penalty(ReportType::Tampered, ReportStatus::Unverified), -8);
        assert_eq!(t.penalty(ReportType::Other, ReportStatus::Verified), -10);
        assert_eq!(t.penalty(ReportType::Other, ReportStatus::Unverified), -5);
    }

    #[test]
    fn decay_windows() {
        let d = DisputeDecay::default();
        assert!((d.factor(0) - 1.0).abs() < f64::EPSILON);
        assert!((d.factor(180) - 1.0).abs() < f64::EPSILON);
        assert!((d.factor(181) - 0.7).abs() < f64::EPSILON);
        assert!((d.factor(365) - 0.7).abs() < f64::EPSILON);
        assert!((d.factor(366) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn max_completeness_is_twenty_five() {
        let p = ScoringPolicy::default();
        assert_eq!(2 * p.required_event_points + p.extra_event_max_points, 25);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let p: ScoringPolicy = toml::from_str("base_offset = 20\n[penalties.stolen]\nverified = -30\nunverified = -15\n").unwrap();
        assert_eq!(p.base_offset, 20);
        assert_eq!(p.penalties.stolen.verified, -30);
        assert_eq!(p.penalties.fraud.verified, -20);
        assert_eq!(p.repair_neutral_points, REPAIR_NEUTRAL_POINTS);
    }
}
