//! Dispute penalty: per-report penalties decayed by report age.

use chrono::{DateTime, Utc};
use devtrust_core::{DeviceHistory, Dispute};

use super::{days_between, ScoringPolicy};

/// Decayed penalty for a single report. Always <= 0.
///
/// Decayed values are floored, so a fractional penalty rounds away from
/// zero: `-25 * 0.5` becomes `-13`, not `-12`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn decayed_penalty(dispute: &Dispute, policy: &ScoringPolicy, now: DateTime<Utc>) -> i32 {
    let base = policy.penalties.penalty(dispute.report_type, dispute.status);
    let factor = policy.decay.factor(days_between(dispute.created_at, now));

    if (factor - 1.0).abs() < f64::EPSILON {
        base
    } else {
        (f64::from(base) * factor).floor() as i32
    }
}

/// Sum of decayed penalties. No lower bound.
#[must_use]
pub fn dispute_penalty(history: &DeviceHistory, policy: &ScoringPolicy, now: DateTime<Utc>) -> i32 {
    history
        .disputes
        .iter()
        .map(|d| decayed_penalty(d, policy, now))
        .fold(0i32, i32::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use devtrust_core::{ReportStatus, ReportType};

    fn dispute(report_type: ReportType, status: ReportStatus, days_ago: i64, now: DateTime<Utc>) -> Dispute {
        Dispute {
            report_type,
            status,
            created_at: now - Duration::days(days_ago),
        }
    }

    #[test]
    fn recent_reports_are_not_decayed() {
        let p = ScoringPolicy::default();
        let now = Utc::now();
        let d = dispute(ReportType::Stolen, ReportStatus::Verified, 10, now);
        assert_eq!(decayed_penalty(&d, &p, now), -25);
        let d = dispute(ReportType::Tampered, ReportStatus::Unverified, 180, now);
        assert_eq!(decayed_penalty(&d, &p, now), -8);
    }

    #[test]
    fn decay_floors_away_from_zero() {
        let p = ScoringPolicy::default();
        let now = Utc::now();
        // -25 * 0.7 = -17.5 -> -18
        let d = dispute(ReportType::Stolen, ReportStatus::Verified, 200, now);
        assert_eq!(decayed_penalty(&d, &p, now), -18);
        // -25 * 0.5 = -12.5 -> -13
        let d = dispute(ReportType::Stolen, ReportStatus::Verified, 400, now);
        assert_eq!(decayed_penalty(&d, &p, now), -13);
        // -5 * 0.7 = -3.5 -> -4
        let d = dispute(ReportType::Other, ReportStatus::Unverified, 365, now);
        assert_eq!(decayed_penalty(&d, &p, now), -4);
        // -8 * 0.5 = -4 exactly
        let d = dispute(ReportType::Tampered, ReportStatus::Unverified, 366, now);
        assert_eq!(decayed_penalty(&d, &p, now), -4);
    }

    #[test]
    fn older_reports_never_weigh_more() {
        let p = ScoringPolicy::default();
        let now = Utc::now();
        for report_type in [ReportType::Stolen, ReportType::Fraud, ReportType::Tampered, ReportType::Other] {
            for status in [ReportStatus::Verified, ReportStatus::Unverified] {
                let mut previous = i32::MIN;
                for days in [0, 90, 180, 181, 300, 365, 366, 1000] {
                    let penalty = decayed_penalty(&dispute(report_type, status, days, now), &p, now);
                    assert!(penalty <= 0);
                    assert!(penalty >= previous, "{report_type} {status:?} at {days} days");
                    previous = penalty;
                }
            }
        }
    }

    #[test]
    fn penalties_sum_without_floor() {
        let p = ScoringPolicy::default();
        let now = Utc::now();
        let history = DeviceHistory {
            disputes: (0..10)
                .map(|_| dispute(ReportType::Stolen, ReportStatus::Verified, 1, now))
                .collect(),
            ..Default::default()
        };
        assert_eq!(dispute_penalty(&history, &p, now), -250);
        assert_eq!(dispute_penalty(&DeviceHistory::default(), &p, now), 0);
    }
}
