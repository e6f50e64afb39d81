//! Value types exchanged between the engine and its callers.

pub mod candidate;
pub mod fingerprint;
pub mod history;
pub mod score;

pub use candidate::{MatchCandidate, MatchType, Verdict};
pub use fingerprint::{CatalogEntry, DeviceFingerprint, DeviceIdentifier, SensorKind, SensorPatterns};
pub use history::{DeviceEvent, DeviceHistory, Dispute, OwnershipRecord, ReportStatus, ReportType};
pub use score::{RiskCategory, ScoreComponents, TrustScoreResult};
