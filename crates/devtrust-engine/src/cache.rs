//! Write-through cache of computed trust scores.
//!
//! Persists through the store first, then updates the in-memory copy. The
//! previous score (cached, or else the one last persisted in the store) is
//! handed back to the caller for delta reporting; the calculator itself
//! never sees it.

use devtrust_core::{Result, TrustScoreResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::DeviceStore;

/// Latest trust score per device, backed by a [`DeviceStore`].
#[derive(Debug)]
pub struct ScoreCache<S> {
    store: Arc<S>,
    scores: RwLock<HashMap<String, TrustScoreResult>>,
}

impl<S: DeviceStore> ScoreCache<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            scores: RwLock::new(HashMap::new()),
        }
    }

    /// Cached score for a device, if one was recorded.
    pub async fn get(&self, device_id: &str) -> Option<TrustScoreResult> {
        self.scores.read().await.get(device_id).cloned()
    }

    /// Persist a freshly computed score and cache it.
    ///
    /// Returns the previous score: the cached one, or on a cache miss the
    /// score last persisted in the store. Concurrent writers for the same
    /// device resolve last-write-wins. On a store error the cache is left
    /// untouched.
    pub async fn record(&self, device_id: &str, result: TrustScoreResult) -> Result<Option<TrustScoreResult>> {
        let stored = match self.get(device_id).await {
            Some(_) => None,
            None => self.store.load_trust_score(device_id).await?,
        };
        self.store.persist_trust_score(device_id, &result).await?;
        let previous = self
            .scores
            .write()
            .await
            .insert(device_id.to_string(), result)
            .or(stored);
        debug!(
            device_id,
            previous = ?previous.as_ref().map(|p| p.score),
            "trust score cached"
        );
        Ok(previous)
    }

    /// Drop a device's cached score.
    pub async fn invalidate(&self, device_id: &str) -> Option<TrustScoreResult> {
        self.scores.write().await.remove(device_id)
    }

    /// Number of cached scores.
    pub async fn len(&self) -> usize {
        self.scores.read().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.scores.read().await.is_empty()
    }
}
