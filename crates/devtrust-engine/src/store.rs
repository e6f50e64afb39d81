//! Storage collaborator boundary.
//!
//! The engine never touches persistence directly. Callers load history and
//! catalog data through a [`DeviceStore`] before scoring and persist results
//! after. [`MemoryStore`] is the in-process implementation used by the CLI
//! and tests; it can be seeded from a JSON snapshot file.

use async_trait::async_trait;
use devtrust_core::{
    CatalogEntry, DeviceFingerprint, DeviceHistory, RegistryError, Result, TrustScoreResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

use crate::fingerprint::fingerprint_hash;

/// Storage operations the engine's callers rely on.
#[async_trait]
pub trait DeviceStore: Send + Sync {
    /// Full history for one device.
    async fn load_device_history(&self, device_id: &str) -> Result<DeviceHistory>;

    /// Every stored fingerprint, in stable catalog order.
    async fn load_fingerprint_catalog(&self) -> Result<Vec<CatalogEntry>>;

    /// Last persisted trust score for a device, if one was ever stored.
    async fn load_trust_score(&self, device_id: &str) -> Result<Option<TrustScoreResult>>;

    /// Upsert the latest trust score for a device.
    async fn persist_trust_score(&self, device_id: &str, result: &TrustScoreResult) -> Result<()>;

    /// Upsert a device's fingerprint. Replaces any previous fingerprint.
    async fn persist_fingerprint(
        &self,
        device_id: &str,
        fingerprint: &DeviceFingerprint,
        fingerprint_hash: &str,
    ) -> Result<()>;
}

/// Everything stored about one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    #[serde(default)]
    pub history: DeviceHistory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<DeviceFingerprint>,
    /// Derived from `fingerprint` whenever the record is stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint_hash: Option<String>,
    /// Last persisted trust score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust_score: Option<TrustScoreResult>,
}

impl DeviceRecord {
    /// New record with no history.
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    fn rehash(&mut self) {
        self.fingerprint_hash = self.fingerprint.as_ref().map(fingerprint_hash);
    }

    fn catalog_entry(&self) -> Option<CatalogEntry> {
        let fingerprint = self.fingerprint.clone()?;
        let fingerprint_hash = self
            .fingerprint_hash
            .clone()
            .unwrap_or_else(|| crate::fingerprint::fingerprint_hash(&fingerprint));
        Some(CatalogEntry {
            device_id: self.device_id.clone(),
            fingerprint,
            fingerprint_hash,
            serial_number: self.serial_number.clone(),
            imei: self.imei.clone(),
        })
    }
}

/// Serializable dump of a registry, used to seed and inspect a [`MemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
}

/// In-memory [`DeviceStore`] keyed by device id.
///
/// Catalog order is device id order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    devices: RwLock<BTreeMap<String, DeviceRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot. Later duplicates of a device id win.
    #[must_use]
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let devices = snapshot
            .devices
            .into_iter()
            .map(|mut record| {
                record.rehash();
                (record.device_id.clone(), record)
            })
            .collect();
        Self {
            devices: RwLock::new(devices),
        }
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Storage(format!("failed to read {}: {e}", path.display())))?;
        let snapshot: RegistrySnapshot = serde_json::from_str(&content)?;
        debug!(path = %path.display(), devices = snapshot.devices.len(), "registry snapshot loaded");
        Ok(Self::from_snapshot(snapshot))
    }

    /// Insert or replace a whole device record.
    pub async fn insert(&self, mut record: DeviceRecord) {
        record.rehash();
        self.devices.write().await.insert(record.device_id.clone(), record);
    }

    /// Copy of one device record.
    pub async fn get(&self, device_id: &str) -> Option<DeviceRecord> {
        self.devices.read().await.get(device_id).cloned()
    }

    /// Current contents as a snapshot.
    pub async fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            devices: self.devices.read().await.values().cloned().collect(),
        }
    }

    /// Number of devices stored.
    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }

    /// Returns true if no devices are stored.
    pub async fn is_empty(&self) -> bool {
        self.devices.read().await.is_empty()
    }
}

#[async_trait]
impl DeviceStore for MemoryStore {
    async fn load_device_history(&self, device_id: &str) -> Result<DeviceHistory> {
        self.devices
            .read()
            .await
            .get(device_id)
            .map(|r| r.history.clone())
            .ok_or_else(|| RegistryError::not_found(device_id))
    }

    async fn load_fingerprint_catalog(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .devices
            .read()
            .await
            .values()
            .filter_map(DeviceRecord::catalog_entry)
            .collect())
    }

    async fn load_trust_score(&self, device_id: &str) -> Result<Option<TrustScoreResult>> {
        self.devices
            .read()
            .await
            .get(device_id)
            .map(|r| r.trust_score.clone())
            .ok_or_else(|| RegistryError::not_found(device_id))
    }

    async fn persist_trust_score(&self, device_id: &str, result: &TrustScoreResult) -> Result<()> {
        let mut devices = self.devices.write().await;
        let record = devices
            .get_mut(device_id)
            .ok_or_else(|| RegistryError::not_found(device_id))?;
        record.trust_score = Some(result.clone());
        debug!(device_id, score = result.score, "trust score persisted");
        Ok(())
    }

    async fn persist_fingerprint(
        &self,
        device_id: &str,
        fingerprint: &DeviceFingerprint,
        fingerprint_hash: &str,
    ) -> Result<()> {
        let mut devices = self.devices.write().await;
        let record = devices
            .get_mut(device_id)
            .ok_or_else(|| RegistryError::not_found(device_id))?;
        record.fingerprint = Some(fingerprint.clone());
        record.fingerprint_hash = Some(fingerprint_hash.to_string());
        debug!(device_id, hash = fingerprint_hash, "fingerprint persisted");
        Ok(())
    }
}
