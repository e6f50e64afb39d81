//! Trust score calculator.
//!
//! A pure function of a device's history and the current time. The result
//! is recomputed from scratch on every call; previous scores are never read.

pub mod dispute;
pub mod events;
pub mod ownership;
pub mod policy;

pub use policy::ScoringPolicy;

use chrono::{DateTime, Utc};
use devtrust_core::{DeviceHistory, RiskCategory, ScoreComponents, TrustScoreResult};
use tracing::{debug, trace};

/// Score a device's history as of now.
#[must_use]
pub fn calculate(history: &DeviceHistory, policy: &ScoringPolicy) -> TrustScoreResult {
    calculate_at(history, policy, Utc::now())
}

/// Score a device's history as of `now`.
///
/// Deterministic: the same history, policy and instant always produce the
/// same result.
#[must_use]
pub fn calculate_at(history: &DeviceHistory, policy: &ScoringPolicy, now: DateTime<Utc>) -> TrustScoreResult {
    // No history at all scores the bare base offset
    let components = if history.is_empty() {
        ScoreComponents::default()
    } else {
        ScoreComponents {
            ownership_continuity: ownership::ownership_continuity(history, policy, now),
            history_completeness: events::history_completeness(history, policy),
            repair_history: events::repair_history(history, policy),
            dispute_penalty: dispute::dispute_penalty(history, policy, now),
        }
    };
    trace!(?components, "trust score components");

    let total = components.sum().saturating_add(policy.base_offset);
    let score = u8::try_from(total.clamp(0, 100)).unwrap_or(0);
    let risk_category =
        RiskCategory::from_score_with(score, policy.low_risk_min_score, policy.medium_risk_min_score);

    debug!(score, risk = %risk_category, disputes = history.disputes.len(), "trust score computed");

    TrustScoreResult {
        score,
        risk_category,
        components,
        calculated_at: now,
    }
}

/// Whole days from `earlier` to `now`. Negative if `earlier` is in the future.
pub(crate) fn days_between(earlier: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - earlier).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use devtrust_core::{DeviceEvent, Dispute, OwnershipRecord, ReportStatus, ReportType};

    fn reference_history(now: DateTime<Utc>) -> DeviceHistory {
        DeviceHistory {
            ownership_records: vec![OwnershipRecord {
                transfer_date: now - Duration::days(90),
                is_current_owner: true,
            }],
            events: vec![
                DeviceEvent::new("registration", true),
                DeviceEvent::new("purchase", true),
            ],
            disputes: Vec::new(),
        }
    }

    fn stolen(days_ago: i64, now: DateTime<Utc>) -> Dispute {
        Dispute {
            report_type: ReportType::Stolen,
            status: ReportStatus::Verified,
            created_at: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn clean_device_example() {
        let now = Utc::now();
        let result = calculate_at(&reference_history(now), &ScoringPolicy::default(), now);

        assert_eq!(result.components.ownership_continuity, 3);
        assert_eq!(result.components.history_completeness, 16);
        assert_eq!(result.components.repair_history, 10);
        assert_eq!(result.components.dispute_penalty, 0);
        assert_eq!(result.score, 54);
        assert_eq!(result.risk_category, RiskCategory::Medium);
        assert_eq!(result.calculated_at, now);
    }

    #[test]
    fn recent_stolen_report_example() {
        let now = Utc::now();
        let mut history = reference_history(now);
        history.disputes.push(stolen(10, now));

        let result = calculate_at(&history, &ScoringPolicy::default(), now);
        assert_eq!(result.components.dispute_penalty, -25);
        assert_eq!(result.score, 29);
        assert_eq!(result.risk_category, RiskCategory::High);
    }

    #[test]
    fn empty_history_scores_base_offset() {
        let now = Utc::now();
        let result = calculate_at(&DeviceHistory::default(), &ScoringPolicy::default(), now);

        assert_eq!(result.components, ScoreComponents::default());
        assert_eq!(result.score, 25);
        assert_eq!(result.risk_category, RiskCategory::High);
    }

    #[test]
    fn any_history_gets_neutral_repair_points() {
        let now = Utc::now();
        let history = DeviceHistory {
            events: vec![DeviceEvent::new("inspection", false)],
            ..Default::default()
        };
        let result = calculate_at(&history, &ScoringPolicy::default(), now);

        assert_eq!(result.components.repair_history, 10);
        assert_eq!(result.score, 35);
    }

    #[test]
    fn score_clamps_at_both_ends() {
        let now = Utc::now();
        let policy = ScoringPolicy::default();

        let mut buried = reference_history(now);
        buried.disputes = (0..20).map(|_| stolen(1, now)).collect();
        let low = calculate_at(&buried, &policy, now);
        assert_eq!(low.score, 0);
        assert_eq!(low.risk_category, RiskCategory::High);
        assert!(low.components.dispute_penalty < -100);

        let mut spotless = reference_history(now);
        spotless.ownership_records[0].transfer_date = now - Duration::days(3650);
        spotless.events.extend((0..5).map(|_| DeviceEvent::new("repair", true)));
        let high = calculate_at(&spotless, &policy, now);
        // 30 + 25 + 20 + 0 + 25 = 100
        assert_eq!(high.score, 100);
        assert_eq!(high.risk_category, RiskCategory::Low);
    }

    #[test]
    fn stolen_report_never_raises_score() {
        let now = Utc::now();
        let policy = ScoringPolicy::default();
        let mut history = reference_history(now);
        for days in [1, 200, 400, 2000] {
            let before = calculate_at(&history, &policy, now).score;
            history.disputes.push(stolen(days, now));
            let after = calculate_at(&history, &policy, now).score;
            assert!(after <= before, "stolen report {days} days old raised score");
        }
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let now = Utc::now();
        let policy = ScoringPolicy::default();
        let mut history = reference_history(now);
        history.disputes.push(stolen(200, now));
        history.events.push(DeviceEvent::new("repair", false));

        assert_eq!(calculate_at(&history, &policy, now), calculate_at(&history, &policy, now));
    }

    #[test]
    fn risk_follows_custom_cutoffs() {
        let now = Utc::now();
        let policy = ScoringPolicy {
            medium_risk_min_score: 20,
            ..ScoringPolicy::default()
        };
        let result = calculate_at(&DeviceHistory::default(), &policy, now);
        assert_eq!(result.score, 25);
        assert_eq!(result.risk_category, RiskCategory::Medium);
    }
}
