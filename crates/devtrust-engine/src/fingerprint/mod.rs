//! Device identity resolution from hardware fingerprints.
//!
//! Two lookup modes:
//! - **Exact**: a canonical fingerprint hash equal to a catalog entry's
//!   stored hash short-circuits to a single 100-point match.
//! - **Similarity**: every catalog entry is scored independently by a set
//!   of [`Comparator`]s; survivors above the floor are ranked.

pub mod compare;
pub mod hash;
pub mod matcher;
pub mod policy;

pub use compare::{
    sensor_similarity, vector_similarity, Comparator, CpuGpuComparator, IdentifierComparator,
    MacComparator, SensorComparator, Signal, SignalKind,
};
pub use hash::fingerprint_hash;
pub use matcher::{Matcher, Probe};
pub use policy::MatchPolicy;
