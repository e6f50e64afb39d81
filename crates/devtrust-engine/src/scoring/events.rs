//! Event-derived components: history completeness and repair history.

use devtrust_core::types::history::{EVENT_PURCHASE, EVENT_REGISTRATION, EVENT_REPAIR};
use devtrust_core::DeviceHistory;

use super::ScoringPolicy;

/// Event types every well-documented device should have.
pub const REQUIRED_EVENTS: [&str; 2] = [EVENT_REGISTRATION, EVENT_PURCHASE];

/// Completeness points: required event types seen among verified events,
/// plus a capped bonus per other verified event. Unverified events count
/// for nothing.
#[must_use]
pub fn history_completeness(history: &DeviceHistory, policy: &ScoringPolicy) -> i32 {
    let required_present = REQUIRED_EVENTS
        .iter()
        .filter(|required| history.verified_events().any(|e| e.is(required)))
        .count();

    let extra_verified = history
        .verified_events()
        .filter(|e| !REQUIRED_EVENTS.contains(&e.event_type.as_str()))
        .count();

    let required_points = i32::try_from(required_present)
        .unwrap_or(0)
        .saturating_mul(policy.required_event_points);
    let extra_points = i32::try_from(extra_verified)
        .unwrap_or(i32::MAX)
        .saturating_mul(policy.extra_event_points)
        .min(policy.extra_event_max_points);

    required_points.saturating_add(extra_points)
}

/// Repair points: start neutral, fold in every repair, clamp once at the end.
#[must_use]
pub fn repair_history(history: &DeviceHistory, policy: &ScoringPolicy) -> i32 {
    let raw = history
        .events
        .iter()
        .filter(|e| e.is(EVENT_REPAIR))
        .fold(policy.repair_neutral_points, |acc, e| {
            if e.verified {
                acc.saturating_add(policy.verified_repair_points)
            } else {
                acc.saturating_sub(policy.unverified_repair_penalty)
            }
        });

    raw.clamp(0, policy.repair_max_points)
}
