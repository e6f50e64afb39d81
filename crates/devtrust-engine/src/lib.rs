//! # devtrust-engine
//!
//! Trust & identity confidence engine for a stolen/used-device registry.
//!
//! Given a device's history, the engine answers "how much should we trust
//! this device?" with a bounded score and an auditable breakdown. Given a
//! (possibly tampered) hardware fingerprint, it answers "which catalogued
//! device is this?" with ranked candidates.
//!
//! ## Trust Scoring
//!
//! - **Ownership continuity** (0..=30) -- one point per 30 days with the
//!   current owner, minus a churn penalty for many transfers
//! - **History completeness** (0..=25) -- verified registration and
//!   purchase events, plus other verified events
//! - **Repair history** (0..=20) -- neutral 10, verified repairs add,
//!   unverified repairs subtract
//! - **Dispute penalty** (<= 0) -- per-report penalty by type and status,
//!   decayed with age
//!
//! ## Data Flow
//!
//! ```text
//! DeviceStore::load_device_history()
//!   -> scoring::calculate()            (pure)
//!   -> ScoreCache::record()            (write-through upsert, returns previous)
//!
//! DeviceStore::load_fingerprint_catalog()
//!   -> Matcher::rank_concurrent()      (pure per entry, fanned out)
//!   -> Verdict + blended confidence    (Verifier)
//! ```
//!
//! The calculator and matcher never perform I/O and share no mutable state;
//! everything stateful lives in [`store`], [`cache`] and [`verify`].

pub mod cache;
pub mod config;
pub mod fingerprint;
pub mod scoring;
pub mod store;
pub mod verify;

pub use cache::ScoreCache;
pub use config::EngineConfig;
pub use devtrust_core::{RegistryError, Result};
pub use fingerprint::{fingerprint_hash, Comparator, MatchPolicy, Matcher, Probe, Signal};
pub use scoring::{calculate, calculate_at, ScoringPolicy};
pub use store::{DeviceRecord, DeviceStore, MemoryStore, RegistrySnapshot};
pub use verify::{blended_confidence, VerificationReport, VerificationRequest, Verifier};
