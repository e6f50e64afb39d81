//! Device history: the raw input to trust scoring.
//!
//! Assembled by the caller from storage. The engine only reads it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event type recorded when a device is first registered.
pub const EVENT_REGISTRATION: &str = "registration";
/// Event type recorded for a retail or private purchase.
pub const EVENT_PURCHASE: &str = "purchase";
/// Event type recorded for a repair.
pub const EVENT_REPAIR: &str = "repair";

/// One ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// When the device changed hands
    pub transfer_date: DateTime<Utc>,
    /// Whether this record describes the present owner
    #[serde(default)]
    pub is_current_owner: bool,
}

/// Something that happened to the device (registration, purchase, repair, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    /// Free-form event type, compared against the `EVENT_*` vocabulary
    pub event_type: String,
    /// Whether a third party confirmed the event
    #[serde(default)]
    pub verified: bool,
}

impl DeviceEvent {
    /// Create an event.
    pub fn new(event_type: impl Into<String>, verified: bool) -> Self {
        Self {
            event_type: event_type.into(),
            verified,
        }
    }

    /// Returns true if this event has the given type.
    #[must_use]
    pub fn is(&self, event_type: &str) -> bool {
        self.event_type == event_type
    }
}

/// Kind of claim made against a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Reported stolen
    Stolen,
    /// Involved in a fraudulent sale
    Fraud,
    /// Hardware or identifiers tampered with
    Tampered,
    /// Anything else
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stolen => write!(f, "stolen"),
            Self::Fraud => write!(f, "fraud"),
            Self::Tampered => write!(f, "tampered"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Review status of a dispute. Anything not `verified` counts as unverified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Confirmed by an investigator
    Verified,
    /// Pending, rejected, or unknown
    #[default]
    #[serde(other)]
    Unverified,
}

/// A third-party report against the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispute {
    /// What the device is accused of
    pub report_type: ReportType,
    /// Review status
    #[serde(default)]
    pub status: ReportStatus,
    /// When the report was filed
    pub created_at: DateTime<Utc>,
}

/// Everything the calculator needs to know about one device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHistory {
    /// Ownership transfers, newest first. At most one is current.
    #[serde(default)]
    pub ownership_records: Vec<OwnershipRecord>,
    /// Recorded events, unordered
    #[serde(default)]
    pub events: Vec<DeviceEvent>,
    /// Reports filed against the device
    #[serde(default)]
    pub disputes: Vec<Dispute>,
}

impl DeviceHistory {
    /// Returns true if there is no history at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ownership_records.is_empty() && self.events.is_empty() && self.disputes.is_empty()
    }

    /// The record of the present owner, if any.
    #[must_use]
    pub fn current_owner(&self) -> Option<&OwnershipRecord> {
        self.ownership_records.iter().find(|r| r.is_current_owner)
    }

    /// Iterate over verified events.
    pub fn verified_events(&self) -> impl Iterator<Item = &DeviceEvent> {
        self.events.iter().filter(|e| e.verified)
    }

    /// Number of verified events.
    #[must_use]
    pub fn verified_event_count(&self) -> usize {
        self.verified_events().count()
    }
}
