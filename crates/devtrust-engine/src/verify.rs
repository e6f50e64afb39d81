//! Verification orchestration.
//!
//! Composes the calculator and matcher for a single request:
//!
//! ```text
//! load history -> calculate -> cache.record (delta)
//!   -> [load catalog -> rank_concurrent -> verdict]
//!   -> blended confidence
//! ```

use chrono::{DateTime, Utc};
use devtrust_core::{
    DeviceFingerprint, DeviceHistory, DeviceIdentifier, MatchCandidate, RegistryError, Result,
    TrustScoreResult, Verdict,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::ScoreCache;
use crate::config::EngineConfig;
use crate::fingerprint::{fingerprint_hash, Matcher, Probe};
use crate::scoring::{calculate_at, ScoringPolicy};
use crate::store::DeviceStore;

/// Confidence before any bonus.
pub const CONFIDENCE_BASE: u8 = 70;
/// Bonus when more than `CONFIDENCE_MIN_VERIFIED_EVENTS` events are verified.
pub const CONFIDENCE_VERIFIED_EVENTS_BONUS: u8 = 10;
/// Verified events needed (exclusive) for the events bonus.
pub const CONFIDENCE_MIN_VERIFIED_EVENTS: usize = 2;
/// Bonus when the trust score exceeds `CONFIDENCE_MIN_TRUST_SCORE`.
pub const CONFIDENCE_TRUST_BONUS: u8 = 15;
/// Trust score needed (exclusive) for the trust bonus.
pub const CONFIDENCE_MIN_TRUST_SCORE: u8 = 70;
/// Bonus when any fingerprint candidate was found.
pub const CONFIDENCE_MATCH_BONUS: u8 = 10;
/// Bonus when the device has any ownership history.
pub const CONFIDENCE_OWNERSHIP_BONUS: u8 = 5;

/// Blend history, score and match evidence into a 0..=100 confidence figure.
#[must_use]
pub fn blended_confidence(history: &DeviceHistory, trust: &TrustScoreResult, candidates: &[MatchCandidate]) -> u8 {
    let mut confidence = CONFIDENCE_BASE;
    if history.verified_event_count() > CONFIDENCE_MIN_VERIFIED_EVENTS {
        confidence = confidence.saturating_add(CONFIDENCE_VERIFIED_EVENTS_BONUS);
    }
    if trust.score > CONFIDENCE_MIN_TRUST_SCORE {
        confidence = confidence.saturating_add(CONFIDENCE_TRUST_BONUS);
    }
    if !candidates.is_empty() {
        confidence = confidence.saturating_add(CONFIDENCE_MATCH_BONUS);
    }
    if !history.ownership_records.is_empty() {
        confidence = confidence.saturating_add(CONFIDENCE_OWNERSHIP_BONUS);
    }
    confidence.min(100)
}

/// A request to verify one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub device_id: String,
    /// Fingerprint read from the physical device, if any
    #[serde(default)]
    pub fingerprint: Option<DeviceFingerprint>,
    /// Precomputed fingerprint hash, if the caller has one
    #[serde(default)]
    pub fingerprint_hash: Option<String>,
    /// Serial number or IMEI read from the physical device
    #[serde(default)]
    pub identifier: Option<DeviceIdentifier>,
}

impl VerificationRequest {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: DeviceFingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    #[must_use]
    pub fn with_identifier(mut self, identifier: DeviceIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Matching probe, or `None` when the request carries nothing to match.
    ///
    /// The hash is derived from the fingerprint when not supplied, so an
    /// unaltered fingerprint resolves through exact lookup.
    fn probe(&self) -> Option<Probe> {
        let probe = Probe {
            fingerprint: self.fingerprint.clone(),
            fingerprint_hash: self.fingerprint_hash.clone(),
            identifier: self.identifier.clone(),
        }
        .with_computed_hash();

        (probe.has_similarity_input() || probe.fingerprint_hash.is_some()).then_some(probe)
    }
}

/// Everything the caller needs to answer a verification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub device_id: String,
    pub trust: TrustScoreResult,
    /// Previously stored score, if the device was ever scored before
    pub previous_score: Option<u8>,
    pub score_delta: Option<i32>,
    /// Ranked fingerprint candidates, empty when nothing was matched
    pub candidates: Vec<MatchCandidate>,
    /// `None` when the request carried nothing to match
    pub verdict: Option<Verdict>,
    /// Blended confidence, 0..=100
    pub confidence: u8,
}

/// Request handler: loads data, runs the engine, persists the score.
#[derive(Debug)]
pub struct Verifier<S> {
    store: Arc<S>,
    cache: ScoreCache<S>,
    scoring: ScoringPolicy,
    matcher: Matcher,
}

impl<S: DeviceStore> Verifier<S> {
    pub fn new(store: Arc<S>, config: &EngineConfig) -> Self {
        Self {
            cache: ScoreCache::new(Arc::clone(&store)),
            store,
            scoring: config.scoring.clone(),
            matcher: Matcher::new(config.matching.clone()),
        }
    }

    /// Replace the matcher, e.g. to add comparators.
    #[must_use]
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub const fn cache(&self) -> &ScoreCache<S> {
        &self.cache
    }

    /// Verify a device as of now.
    pub async fn verify(&self, request: &VerificationRequest) -> Result<VerificationReport> {
        self.verify_at(request, Utc::now()).await
    }

    /// Verify a device as of `now`.
    pub async fn verify_at(&self, request: &VerificationRequest, now: DateTime<Utc>) -> Result<VerificationReport> {
        let device_id = request.device_id.as_str();
        if device_id.trim().is_empty() {
            return Err(RegistryError::InvalidInput("device id is empty".into()));
        }
        let history = self.store.load_device_history(device_id).await?;

        let trust = calculate_at(&history, &self.scoring, now);
        let previous = self.cache.record(device_id, trust.clone()).await?;
        let score_delta = previous.as_ref().map(|p| trust.delta_from(p));

        let (candidates, verdict) = match request.probe() {
            Some(probe) => {
                let catalog = self.store.load_fingerprint_catalog().await?;
                debug!(device_id, catalog = catalog.len(), "matching submitted fingerprint");
                let candidates = self.matcher.rank_concurrent(&probe, catalog).await;
                let verdict = self.matcher.verdict(&candidates);
                (candidates, Some(verdict))
            }
            None => (Vec::new(), None),
        };

        let confidence = blended_confidence(&history, &trust, &candidates);
        info!(
            device_id,
            score = trust.score,
            risk = %trust.risk_category,
            verdict = ?verdict,
            confidence,
            "device verified"
        );

        Ok(VerificationReport {
            device_id: device_id.to_string(),
            previous_score: previous.map(|p| p.score),
            score_delta,
            trust,
            candidates,
            verdict,
            confidence,
        })
    }

    /// Hash and store a device's fingerprint, replacing any earlier one.
    ///
    /// Returns the canonical hash.
    pub async fn register_fingerprint(&self, device_id: &str, fingerprint: &DeviceFingerprint) -> Result<String> {
        if fingerprint.is_empty() {
            return Err(RegistryError::InvalidInput(format!("empty fingerprint for {device_id}")));
        }
        let hash = fingerprint_hash(fingerprint);
        self.store.persist_fingerprint(device_id, fingerprint, &hash).await?;
        info!(device_id, hash = %hash, "fingerprint registered");
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DeviceRecord, MemoryStore};
    use chrono::Duration;
    use devtrust_core::{
        DeviceEvent, Dispute, MatchType, OwnershipRecord, ReportStatus, ReportType, RiskCategory,
    };

    fn phone() -> DeviceFingerprint {
        DeviceFingerprint {
            cpu_gpu_id: Some("qcom-sm8550".into()),
            mac_addresses: ["a4:83:e7:11:22:33", "a4:83:e7:11:22:34"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        }
    }

    async fn seeded(now: DateTime<Utc>) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(DeviceRecord {
                serial_number: Some("SN-CLEAN".into()),
                history: DeviceHistory {
                    ownership_records: vec![OwnershipRecord {
                        transfer_date: now - Duration::days(900),
                        is_current_owner: true,
                    }],
                    events: vec![
                        DeviceEvent::new("registration", true),
                        DeviceEvent::new("purchase", true),
                        DeviceEvent::new("inspection", true),
                    ],
                    disputes: Vec::new(),
                },
                fingerprint: Some(phone()),
                ..DeviceRecord::new("clean")
            })
            .await;
        store.insert(DeviceRecord::new("bare")).await;
        store
    }

    #[test]
    fn confidence_bonuses() {
        let now = Utc::now();
        let empty = DeviceHistory::default();
        let trust = calculate_at(&empty, &ScoringPolicy::default(), now);
        assert_eq!(blended_confidence(&empty, &trust, &[]), 70);

        let mut history = DeviceHistory {
            events: vec![DeviceEvent::new("registration", true), DeviceEvent::new("purchase", true)],
            ..Default::default()
        };
        // Exactly two verified events: no bonus
        assert_eq!(blended_confidence(&history, &trust, &[]), 70);
        history.events.push(DeviceEvent::new("inspection", true));
        assert_eq!(blended_confidence(&history, &trust, &[]), 80);

        history.ownership_records.push(OwnershipRecord {
            transfer_date: now,
            is_current_owner: false,
        });
        assert_eq!(blended_confidence(&history, &trust, &[]), 85);

        let mut high = trust.clone();
        high.score = 71;
        assert_eq!(blended_confidence(&history, &high, &[]), 100);
        high.score = 70;
        assert_eq!(blended_confidence(&history, &high, &[]), 85);
    }

    #[tokio::test]
    async fn verify_scores_and_tracks_delta() {
        let now = Utc::now();
        let store = seeded(now).await;
        let verifier = Verifier::new(Arc::clone(&store), &EngineConfig::default());

        let first = verifier.verify_at(&VerificationRequest::new("clean"), now).await.unwrap();
        // 30 + 19 + 10 + 0 + 25
        assert_eq!(first.trust.score, 84);
        assert_eq!(first.trust.risk_category, RiskCategory::Low);
        assert_eq!(first.previous_score, None);
        assert_eq!(first.score_delta, None);
        assert_eq!(first.verdict, None);
        // 70 + 10 (events) + 15 (score) + 5 (ownership)
        assert_eq!(first.confidence, 100);

        store
            .insert(DeviceRecord {
                history: DeviceHistory {
                    disputes: vec![Dispute {
                        report_type: ReportType::Stolen,
                        status: ReportStatus::Verified,
                        created_at: now - Duration::days(10),
                    }],
                    ..store.load_device_history("clean").await.unwrap()
                },
                ..store.get("clean").await.unwrap()
            })
            .await;

        let second = verifier.verify_at(&VerificationRequest::new("clean"), now).await.unwrap();
        assert_eq!(second.trust.score, 59);
        assert_eq!(second.previous_score, Some(84));
        assert_eq!(second.score_delta, Some(-25));
        assert_eq!(store.get("clean").await.unwrap().trust_score.map(|t| t.score), Some(59));
    }

    #[tokio::test]
    async fn fresh_verifier_reports_delta_against_stored_score() {
        let now = Utc::now();
        let store = seeded(now).await;
        let stored = TrustScoreResult {
            score: 90,
            risk_category: RiskCategory::Low,
            components: devtrust_core::ScoreComponents::default(),
            calculated_at: now - Duration::days(30),
        };
        store
            .insert(DeviceRecord {
                trust_score: Some(stored),
                ..store.get("bare").await.unwrap()
            })
            .await;

        let verifier = Verifier::new(Arc::clone(&store), &EngineConfig::default());
        let report = verifier.verify_at(&VerificationRequest::new("bare"), now).await.unwrap();
        assert_eq!(report.trust.score, 25);
        assert_eq!(report.previous_score, Some(90));
        assert_eq!(report.score_delta, Some(-65));
    }

    #[tokio::test]
    async fn unaltered_fingerprint_verifies_exactly() {
        let now = Utc::now();
        let store = seeded(now).await;
        let verifier = Verifier::new(store, &EngineConfig::default());

        let request = VerificationRequest::new("bare").with_fingerprint(phone());
        let report = verifier.verify_at(&request, now).await.unwrap();

        assert_eq!(report.candidates.len(), 1);
        assert_eq!(report.candidates[0].device_id, "clean");
        assert_eq!(report.candidates[0].match_type, MatchType::Exact);
        assert_eq!(report.verdict, Some(Verdict::Verified));
        // bare device: score 25, no events, no ownership, but a match
        assert_eq!(report.confidence, 80);
    }

    #[tokio::test]
    async fn tampered_fingerprint_falls_back_to_similarity() {
        let now = Utc::now();
        let store = seeded(now).await;
        let verifier = Verifier::new(store, &EngineConfig::default());

        let mut tampered = phone();
        tampered.mac_addresses.remove("a4:83:e7:11:22:34");
        tampered.mac_addresses.insert("02:00:00:00:00:00".into());

        let report = verifier
            .verify_at(&VerificationRequest::new("bare").with_fingerprint(tampered.clone()), now)
            .await
            .unwrap();
        // 25 (cpu) + 10 (one mac)
        assert_eq!(report.candidates[0].match_score, 35);
        assert_eq!(report.verdict, Some(Verdict::NotFound));

        let request = VerificationRequest::new("bare")
            .with_fingerprint(tampered)
            .with_identifier(DeviceIdentifier::SerialNumber("SN-CLEAN".into()));
        let report = verifier.verify_at(&request, now).await.unwrap();
        // 50 + 25 + 10
        assert_eq!(report.candidates[0].match_score, 85);
        assert_eq!(report.candidates[0].match_type, MatchType::Exact);
        assert_eq!(report.verdict, Some(Verdict::Verified));
    }

    #[tokio::test]
    async fn register_fingerprint_overwrites() {
        let now = Utc::now();
        let store = seeded(now).await;
        let verifier = Verifier::new(Arc::clone(&store), &EngineConfig::default());

        let replacement = DeviceFingerprint {
            cpu_gpu_id: Some("apple-a17".into()),
            ..Default::default()
        };
        let hash = verifier.register_fingerprint("clean", &replacement).await.unwrap();
        assert_eq!(hash, fingerprint_hash(&replacement));

        let record = store.get("clean").await.unwrap();
        assert_eq!(record.fingerprint, Some(replacement));
        assert_eq!(record.fingerprint_hash, Some(hash));

        let err = verifier.register_fingerprint("ghost", &phone()).await.unwrap_err();
        assert!(err.is_not_found());

        let err = verifier
            .register_fingerprint("clean", &DeviceFingerprint::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_device_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        let verifier = Verifier::new(store, &EngineConfig::default());
        let err = verifier.verify(&VerificationRequest::new("ghost")).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(verifier.cache().is_empty().await);

        let err = verifier.verify(&VerificationRequest::new("  ")).await.unwrap_err();
        assert!(matches!(err, RegistryError::InvalidInput(_)));
    }
}
