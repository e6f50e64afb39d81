//! Fingerprint matching thresholds.

use serde::{Deserialize, Serialize};

/// Averaged sensor similarity above which sensors count as a strong match.
pub const SENSOR_STRONG_SIMILARITY: f64 = 0.8;
/// Averaged sensor similarity above which sensors count as a partial match.
pub const SENSOR_PARTIAL_SIMILARITY: f64 = 0.6;
/// Points for a strong sensor match.
pub const SENSOR_STRONG_POINTS: u32 = 30;
/// Points for a partial sensor match.
pub const SENSOR_PARTIAL_POINTS: u32 = 15;
/// Points for an identical CPU/GPU identifier.
pub const CPU_GPU_POINTS: u32 = 25;
/// Points per shared MAC address.
pub const MAC_POINTS_PER_ADDRESS: u32 = 10;
/// Cap on MAC address points.
pub const MAC_MAX_POINTS: u32 = 20;
/// Flat points for a serial number or IMEI match.
pub const IDENTIFIER_BASE_POINTS: u32 = 50;
/// Exact threshold when an identifier matched as well.
///
/// Higher than the fingerprint-only threshold because the identifier
/// already contributes its base points.
pub const IDENTIFIER_EXACT_THRESHOLD: u8 = 70;
/// Exact threshold for fingerprint-only matches.
pub const FINGERPRINT_EXACT_THRESHOLD: u8 = 40;
/// Candidates scoring below this are dropped.
pub const CANDIDATE_FLOOR: u8 = 30;
/// Ranked candidates returned per request.
pub const MAX_CANDIDATES: usize = 5;
/// Best-candidate score that confirms identity.
pub const VERIFIED_MIN_SCORE: u8 = 80;
/// Best-candidate score that flags the device as suspicious.
pub const SUSPICIOUS_MIN_SCORE: u8 = 50;
/// Catalog entries scored per blocking task in concurrent scans.
pub const PARALLEL_CHUNK_SIZE: usize = 256;

/// Every tunable used by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub sensor_strong_similarity: f64,
    pub sensor_partial_similarity: f64,
    pub sensor_strong_points: u32,
    pub sensor_partial_points: u32,
    pub cpu_gpu_points: u32,
    pub mac_points_per_address: u32,
    pub mac_max_points: u32,
    pub identifier_base_points: u32,
    pub identifier_exact_threshold: u8,
    pub fingerprint_exact_threshold: u8,
    pub candidate_floor: u8,
    pub max_candidates: usize,
    pub verified_min_score: u8,
    pub suspicious_min_score: u8,
    pub parallel_chunk_size: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            sensor_strong_similarity: SENSOR_STRONG_SIMILARITY,
            sensor_partial_similarity: SENSOR_PARTIAL_SIMILARITY,
            sensor_strong_points: SENSOR_STRONG_POINTS,
            sensor_partial_points: SENSOR_PARTIAL_POINTS,
            cpu_gpu_points: CPU_GPU_POINTS,
            mac_points_per_address: MAC_POINTS_PER_ADDRESS,
            mac_max_points: MAC_MAX_POINTS,
            identifier_base_points: IDENTIFIER_BASE_POINTS,
            identifier_exact_threshold: IDENTIFIER_EXACT_THRESHOLD,
            fingerprint_exact_threshold: FINGERPRINT_EXACT_THRESHOLD,
            candidate_floor: CANDIDATE_FLOOR,
            max_candidates: MAX_CANDIDATES,
            verified_min_score: VERIFIED_MIN_SCORE,
            suspicious_min_score: SUSPICIOUS_MIN_SCORE,
            parallel_chunk_size: PARALLEL_CHUNK_SIZE,
        }
    }
}
