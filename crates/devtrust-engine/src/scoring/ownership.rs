//! Ownership continuity: reward stable ownership, penalize churn.

use chrono::{DateTime, Utc};
use devtrust_core::DeviceHistory;

use super::{days_between, ScoringPolicy};

/// Continuity points in `0..=ownership_max_points`.
///
/// One point per full period held by the current owner. Devices with more
/// than `churn_free_records` transfers lose points per extra transfer.
/// Without a current owner the component is 0.
#[must_use]
pub fn ownership_continuity(history: &DeviceHistory, policy: &ScoringPolicy, now: DateTime<Utc>) -> i32 {
    let Some(owner) = history.current_owner() else {
        return 0;
    };

    let held_days = days_between(owner.transfer_date, now);
    let periods = held_days
        .div_euclid(policy.ownership_period_days.max(1))
        .clamp(0, i64::from(policy.ownership_max_points));
    let base = i32::try_from(periods).unwrap_or(0);

    let record_count = history.ownership_records.len();
    let churn_penalty = if record_count > policy.churn_free_records {
        i32::try_from(record_count - policy.churn_free_records)
            .unwrap_or(i32::MAX)
            .saturating_mul(policy.churn_penalty_per_record)
    } else {
        0
    };

    base.saturating_sub(churn_penalty).max(0)
}
