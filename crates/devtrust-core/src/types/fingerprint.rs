//! Hardware fingerprints and the catalog they are matched against.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named sensor whose raw samples form part of a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Accelerometer bias/noise samples
    Accelerometer,
    /// Gyroscope drift samples
    Gyroscope,
    /// Magnetometer offset samples
    Magnetometer,
}

impl SensorKind {
    /// Every sensor kind, in canonical order.
    pub const ALL: [Self; 3] = [Self::Accelerometer, Self::Gyroscope, Self::Magnetometer];
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accelerometer => write!(f, "accelerometer"),
            Self::Gyroscope => write!(f, "gyroscope"),
            Self::Magnetometer => write!(f, "magnetometer"),
        }
    }
}

/// Optional sensor sample vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorPatterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerometer: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gyroscope: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnetometer: Option<Vec<f64>>,
}

impl SensorPatterns {
    /// Samples for one sensor, if present.
    #[must_use]
    pub fn get(&self, kind: SensorKind) -> Option<&[f64]> {
        match kind {
            SensorKind::Accelerometer => self.accelerometer.as_deref(),
            SensorKind::Gyroscope => self.gyroscope.as_deref(),
            SensorKind::Magnetometer => self.magnetometer.as_deref(),
        }
    }

    /// Returns true if no sensor has samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        SensorKind::ALL.iter().all(|k| self.get(*k).is_none())
    }
}

/// Bundle of hardware signals used to re-identify a device.
///
/// MAC addresses are kept as a sorted set, so submission order never
/// affects comparison or hashing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceFingerprint {
    #[serde(default)]
    pub sensor_patterns: SensorPatterns,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_gpu_id: Option<String>,
    #[serde(default)]
    pub mac_addresses: BTreeSet<String>,
}

impl DeviceFingerprint {
    /// Returns true if the fingerprint carries no signal at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sensor_patterns.is_empty() && self.cpu_gpu_id.is_none() && self.mac_addresses.is_empty()
    }
}

/// A direct identifier claimed for a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DeviceIdentifier {
    /// Manufacturer serial number
    SerialNumber(String),
    /// GSM/UMTS IMEI
    Imei(String),
}

impl DeviceIdentifier {
    /// Component label recorded when this identifier matches.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SerialNumber(_) => "serial_number",
            Self::Imei(_) => "imei",
        }
    }

    /// The raw identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::SerialNumber(v) | Self::Imei(v) => v,
        }
    }
}

/// A stored fingerprint together with the device it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub device_id: String,
    pub fingerprint: DeviceFingerprint,
    /// Canonical hash of `fingerprint`, computed when it was stored
    pub fingerprint_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
}

impl CatalogEntry {
    /// Returns true if the entry carries the given serial number or IMEI.
    #[must_use]
    pub fn has_identifier(&self, identifier: &DeviceIdentifier) -> bool {
        let stored = match identifier {
            DeviceIdentifier::SerialNumber(_) => self.serial_number.as_deref(),
            DeviceIdentifier::Imei(_) => self.imei.as_deref(),
        };
        stored == Some(identifier.value())
    }
}
