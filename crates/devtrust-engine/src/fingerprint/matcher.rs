//! Catalog matching and ranking.

use std::sync::Arc;

use devtrust_core::{
    CatalogEntry, DeviceFingerprint, DeviceIdentifier, MatchCandidate, MatchType, Verdict,
};
use futures_util::future::join_all;
use tracing::{debug, trace, warn};

use super::compare::{
    Comparator, CpuGpuComparator, IdentifierComparator, MacComparator, SensorComparator, Signal,
    SignalKind,
};
use super::hash::fingerprint_hash;
use super::policy::MatchPolicy;

/// Component label for an exact hash match.
pub const HASH_COMPONENT: &str = "fingerprint_hash";

/// What the caller submitted for identification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probe {
    /// Raw fingerprint for similarity scoring
    pub fingerprint: Option<DeviceFingerprint>,
    /// Precomputed canonical hash for exact lookup
    pub fingerprint_hash: Option<String>,
    /// Claimed serial number or IMEI
    pub identifier: Option<DeviceIdentifier>,
}

impl Probe {
    /// Probe with a raw fingerprint only.
    #[must_use]
    pub fn fingerprint(fingerprint: DeviceFingerprint) -> Self {
        Self {
            fingerprint: Some(fingerprint),
            ..Self::default()
        }
    }

    /// Probe with a precomputed hash only.
    #[must_use]
    pub fn hash(hash: impl Into<String>) -> Self {
        Self {
            fingerprint_hash: Some(hash.into()),
            ..Self::default()
        }
    }

    /// Probe with a direct identifier only.
    #[must_use]
    pub fn identifier(identifier: DeviceIdentifier) -> Self {
        Self {
            identifier: Some(identifier),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: DeviceIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.fingerprint_hash = Some(hash.into());
        self
    }

    /// Fill in the hash from the raw fingerprint if none was supplied.
    #[must_use]
    pub fn with_computed_hash(mut self) -> Self {
        if self.fingerprint_hash.is_none() {
            self.fingerprint_hash = self.fingerprint.as_ref().map(fingerprint_hash);
        }
        self
    }

    /// Returns true if similarity scoring has anything to work with.
    #[must_use]
    pub const fn has_similarity_input(&self) -> bool {
        self.fingerprint.is_some() || self.identifier.is_some()
    }
}

/// Scores probes against a fingerprint catalog.
///
/// Stateless between calls and cheap to clone; comparators are shared.
#[derive(Clone)]
pub struct Matcher {
    policy: MatchPolicy,
    comparators: Vec<Arc<dyn Comparator>>,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("policy", &self.policy)
            .field("comparators", &self.comparators.len())
            .finish()
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

impl Matcher {
    /// Matcher with the built-in sensor, CPU/GPU, MAC and identifier comparators.
    #[must_use]
    pub fn new(policy: MatchPolicy) -> Self {
        let comparators: Vec<Arc<dyn Comparator>> = vec![
            Arc::new(IdentifierComparator::from_policy(&policy)),
            Arc::new(SensorComparator::from_policy(&policy)),
            Arc::new(CpuGpuComparator::from_policy(&policy)),
            Arc::new(MacComparator::from_policy(&policy)),
        ];
        Self { policy, comparators }
    }

    /// Add another signal.
    #[must_use]
    pub fn with_comparator(mut self, comparator: impl Comparator + 'static) -> Self {
        self.comparators.push(Arc::new(comparator));
        self
    }

    #[must_use]
    pub const fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// First catalog entry whose stored hash equals the probe's hash.
    #[must_use]
    pub fn exact_match(&self, probe: &Probe, catalog: &[CatalogEntry]) -> Option<MatchCandidate> {
        let hash = probe.fingerprint_hash.as_deref()?;
        let entry = catalog.iter().find(|e| e.fingerprint_hash == hash)?;
        debug!(device_id = %entry.device_id, "exact fingerprint hash match");
        Some(MatchCandidate {
            device_id: entry.device_id.clone(),
            match_score: 100,
            match_type: MatchType::Exact,
            matched_components: std::iter::once(HASH_COMPONENT.to_string()).collect(),
        })
    }

    /// Score one catalog entry. `None` if nothing matched or the total is
    /// below the candidate floor.
    #[must_use]
    pub fn score_entry(&self, probe: &Probe, entry: &CatalogEntry) -> Option<MatchCandidate> {
        let signals: Vec<Signal> = self
            .comparators
            .iter()
            .filter_map(|c| c.compare(probe, entry))
            .collect();
        if signals.is_empty() {
            return None;
        }

        let total = signals
            .iter()
            .map(|s| s.points)
            .fold(0u32, u32::saturating_add)
            .min(100);
        let match_score = u8::try_from(total).unwrap_or(100);
        if match_score < self.policy.candidate_floor {
            trace!(device_id = %entry.device_id, match_score, "below candidate floor");
            return None;
        }

        let exact_threshold = if signals.iter().any(|s| s.kind == SignalKind::Identifier) {
            self.policy.identifier_exact_threshold
        } else {
            self.policy.fingerprint_exact_threshold
        };
        let match_type = if match_score >= exact_threshold {
            MatchType::Exact
        } else {
            MatchType::Partial
        };

        Some(MatchCandidate {
            device_id: entry.device_id.clone(),
            match_score,
            match_type,
            matched_components: signals.iter().map(|s| s.label.to_string()).collect(),
        })
    }

    /// Rank the catalog against a probe, sequentially.
    ///
    /// An exact hash hit returns that single candidate. Otherwise every
    /// entry is scored and the best `max_candidates` are returned, highest
    /// first, ties in catalog order.
    #[must_use]
    pub fn rank(&self, probe: &Probe, catalog: &[CatalogEntry]) -> Vec<MatchCandidate> {
        if let Some(hit) = self.exact_match(probe, catalog) {
            return vec![hit];
        }
        if !probe.has_similarity_input() {
            return Vec::new();
        }

        let candidates = catalog
            .iter()
            .filter_map(|entry| self.score_entry(probe, entry))
            .collect();
        self.finish(candidates, catalog.len())
    }

    /// Same result as [`Matcher::rank`], with the catalog scored in chunks
    /// on the blocking thread pool.
    pub async fn rank_concurrent(&self, probe: &Probe, catalog: Vec<CatalogEntry>) -> Vec<MatchCandidate> {
        if let Some(hit) = self.exact_match(probe, &catalog) {
            return vec![hit];
        }
        if !probe.has_similarity_input() {
            return Vec::new();
        }

        let catalog_size = catalog.len();
        let chunk_size = self.policy.parallel_chunk_size.max(1);
        let probe = Arc::new(probe.clone());
        let mut entries = catalog.into_iter();
        let mut tasks = Vec::new();

        loop {
            let chunk: Vec<CatalogEntry> = entries.by_ref().take(chunk_size).collect();
            if chunk.is_empty() {
                break;
            }
            let matcher = self.clone();
            let probe = Arc::clone(&probe);
            tasks.push(tokio::task::spawn_blocking(move || {
                chunk
                    .iter()
                    .filter_map(|entry| matcher.score_entry(&probe, entry))
                    .collect::<Vec<_>>()
            }));
        }

        // join_all keeps task order, so catalog order survives for ties
        let mut candidates = Vec::new();
        for joined in join_all(tasks).await {
            match joined {
                Ok(mut part) => candidates.append(&mut part),
                Err(e) => warn!(error = %e, "catalog scan task failed"),
            }
        }
        self.finish(candidates, catalog_size)
    }

    /// Verdict for the best candidate in a ranked list.
    #[must_use]
    pub fn verdict(&self, ranked: &[MatchCandidate]) -> Verdict {
        Verdict::from_best_score(
            ranked.iter().map(|c| c.match_score).max(),
            self.policy.verified_min_score,
            self.policy.suspicious_min_score,
        )
    }

    fn finish(&self, mut candidates: Vec<MatchCandidate>, catalog_size: usize) -> Vec<MatchCandidate> {
        // sort_by is stable
        candidates.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        let survivors = candidates.len();
        candidates.truncate(self.policy.max_candidates);
        debug!(catalog_size, survivors, returned = candidates.len(), "fingerprint catalog scanned");
        candidates
    }
}
