//! Per-signal comparators.
//!
//! Each comparator looks at one kind of evidence and either awards points
//! with a label or stays silent. The matcher only sums what they return,
//! so a new signal is a new [`Comparator`] and nothing else.

use devtrust_core::{CatalogEntry, SensorKind, SensorPatterns};

use super::matcher::Probe;
use super::policy::MatchPolicy;

/// Where a signal's evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// Hardware fingerprint similarity
    Fingerprint,
    /// Direct serial number / IMEI match
    Identifier,
}

/// Points awarded by one comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub points: u32,
    /// Recorded in `MatchCandidate::matched_components`
    pub label: &'static str,
    pub kind: SignalKind,
}

impl Signal {
    const fn fingerprint(points: u32, label: &'static str) -> Self {
        Self {
            points,
            label,
            kind: SignalKind::Fingerprint,
        }
    }
}

/// One independent line of evidence that a probe matches a catalog entry.
///
/// Implementations must be pure: the matcher calls them from several
/// threads at once.
pub trait Comparator: Send + Sync {
    /// Points and label if this signal matched, `None` otherwise.
    fn compare(&self, probe: &Probe, entry: &CatalogEntry) -> Option<Signal>;
}

/// Element-wise similarity of two sample vectors, averaged.
///
/// Each element scores `1 - |a - b| / max(|a|, |b|, 1)`. Vectors of
/// different length, or empty vectors, score 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn vector_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let total: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let scale = x.abs().max(y.abs()).max(1.0);
            1.0 - (x - y).abs() / scale
        })
        .sum();
    total / a.len() as f64
}

/// Average similarity over the sensors present in both patterns.
///
/// `None` when no sensor is comparable.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sensor_similarity(a: &SensorPatterns, b: &SensorPatterns) -> Option<f64> {
    let per_sensor: Vec<f64> = SensorKind::ALL
        .iter()
        .filter_map(|kind| match (a.get(*kind), b.get(*kind)) {
            (Some(x), Some(y)) => Some(vector_similarity(x, y)),
            _ => None,
        })
        .collect();

    if per_sensor.is_empty() {
        return None;
    }
    Some(per_sensor.iter().sum::<f64>() / per_sensor.len() as f64)
}

/// Sensor sample similarity: strong above 0.8, partial above 0.6.
#[derive(Debug, Clone)]
pub struct SensorComparator {
    strong_similarity: f64,
    partial_similarity: f64,
    strong_points: u32,
    partial_points: u32,
}

impl SensorComparator {
    #[must_use]
    pub const fn from_policy(policy: &MatchPolicy) -> Self {
        Self {
            strong_similarity: policy.sensor_strong_similarity,
            partial_similarity: policy.sensor_partial_similarity,
            strong_points: policy.sensor_strong_points,
            partial_points: policy.sensor_partial_points,
        }
    }
}

impl Comparator for SensorComparator {
    fn compare(&self, probe: &Probe, entry: &CatalogEntry) -> Option<Signal> {
        let submitted = probe.fingerprint.as_ref()?;
        let similarity = sensor_similarity(&submitted.sensor_patterns, &entry.fingerprint.sensor_patterns)?;

        if similarity > self.strong_similarity {
            Some(Signal::fingerprint(self.strong_points, "sensor_patterns"))
        } else if similarity > self.partial_similarity {
            Some(Signal::fingerprint(self.partial_points, "sensor_patterns_partial"))
        } else {
            None
        }
    }
}

/// Exact CPU/GPU identifier equality.
#[derive(Debug, Clone)]
pub struct CpuGpuComparator {
    points: u32,
}

impl CpuGpuComparator {
    #[must_use]
    pub const fn from_policy(policy: &MatchPolicy) -> Self {
        Self {
            points: policy.cpu_gpu_points,
        }
    }
}

impl Comparator for CpuGpuComparator {
    fn compare(&self, probe: &Probe, entry: &CatalogEntry) -> Option<Signal> {
        let submitted = probe.fingerprint.as_ref()?.cpu_gpu_id.as_deref()?;
        let stored = entry.fingerprint.cpu_gpu_id.as_deref()?;
        (submitted == stored).then(|| Signal::fingerprint(self.points, "cpu_gpu_id"))
    }
}

/// Shared MAC addresses, a fixed number of points each up to a cap.
#[derive(Debug, Clone)]
pub struct MacComparator {
    points_per_address: u32,
    max_points: u32,
}

impl MacComparator {
    #[must_use]
    pub const fn from_policy(policy: &MatchPolicy) -> Self {
        Self {
            points_per_address: policy.mac_points_per_address,
            max_points: policy.mac_max_points,
        }
    }
}

impl Comparator for MacComparator {
    fn compare(&self, probe: &Probe, entry: &CatalogEntry) -> Option<Signal> {
        let submitted = probe.fingerprint.as_ref()?;
        let common = submitted
            .mac_addresses
            .intersection(&entry.fingerprint.mac_addresses)
            .count();
        if common == 0 {
            return None;
        }
        let points = u32::try_from(common)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.points_per_address)
            .min(self.max_points);
        Some(Signal::fingerprint(points, "mac_addresses"))
    }
}

/// Serial number or IMEI equality. Switches the candidate onto the
/// identifier path with its own exact threshold.
#[derive(Debug, Clone)]
pub struct IdentifierComparator {
    points: u32,
}

impl IdentifierComparator {
    #[must_use]
    pub const fn from_policy(policy: &MatchPolicy) -> Self {
        Self {
            points: policy.identifier_base_points,
        }
    }
}

impl Comparator for IdentifierComparator {
    fn compare(&self, probe: &Probe, entry: &CatalogEntry) -> Option<Signal> {
        let identifier = probe.identifier.as_ref()?;
        entry.has_identifier(identifier).then(|| Signal {
            points: self.points,
            label: identifier.label(),
            kind: SignalKind::Identifier,
        })
    }
}
