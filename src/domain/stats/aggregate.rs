//! Aggregate statistics computed from request records

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::policy::ModelVersion;
use crate::domain::record::RequestRecord;

// ============================================================================
// LatencyStats
// ============================================================================

/// Latency statistics for a model version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Average latency in milliseconds
    pub avg_ms: f64,
    /// Minimum latency in milliseconds
    pub min_ms: u64,
    /// Maximum latency in milliseconds
    pub max_ms: u64,
    /// 50th percentile (median) latency
    pub p50_ms: u64,
    /// 95th percentile latency
    pub p95_ms: u64,
    /// 99th percentile latency
    pub p99_ms: u64,
}

impl LatencyStats {
    /// Calculate latency statistics from a list of samples
    pub fn from_samples(mut samples: Vec<u64>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        samples.sort_unstable();
        let len = samples.len();
        let sum: u64 = samples.iter().sum();

        Self {
            avg_ms: sum as f64 / len as f64,
            min_ms: samples[0],
            max_ms: samples[len - 1],
            p50_ms: percentile(&samples, 50.0),
            p95_ms: percentile(&samples, 95.0),
            p99_ms: percentile(&samples, 99.0),
        }
    }
}

/// Calculate a percentile from a sorted list
fn percentile(sorted_samples: &[u64], p: f64) -> u64 {
    if sorted_samples.is_empty() {
        return 0;
    }

    if sorted_samples.len() == 1 {
        return sorted_samples[0];
    }

    let index = (p / 100.0 * (sorted_samples.len() - 1) as f64) as usize;
    sorted_samples[index.min(sorted_samples.len() - 1)]
}

// ============================================================================
// VersionStats
// ============================================================================

/// Aggregated request statistics for a single model version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionStats {
    /// Number of requests served by this version
    pub request_count: u64,
    /// Share of total traffic, as a percentage (0.0 - 100.0)
    pub traffic_percentage: f64,
    /// Share of requests with a positive (churn) label, as a percentage
    pub churn_rate: f64,
    /// Latency statistics
    pub latency: LatencyStats,
}

// ============================================================================
// AggregateStats
// ============================================================================

/// Descriptive statistics across all versions, derived from the current
/// record set on demand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Total requests across all versions
    pub total_requests: u64,
    /// Per-version statistics; every known version is present, with zero
    /// counts when it has served no traffic
    pub versions: HashMap<ModelVersion, VersionStats>,
}

impl AggregateStats {
    /// Stats for a specific version, if known
    pub fn version(&self, version: &ModelVersion) -> Option<&VersionStats> {
        self.versions.get(version)
    }
}

/// Compute per-version statistics over the given records.
///
/// Pure function of its inputs. `known_versions` fixes the output key set:
/// versions without a single matching record still appear, with zero counts
/// and defined-zero rate and latency fields. An empty record set yields
/// `total_requests == 0` and all-zero entries, never a division by zero.
/// `positive_class` is the label counted towards the churn rate.
pub fn aggregate(
    records: &[RequestRecord],
    known_versions: &[ModelVersion],
    positive_class: usize,
) -> AggregateStats {
    let total = records.len() as u64;
    let mut versions = HashMap::with_capacity(known_versions.len());

    for version in known_versions {
        let matching: Vec<&RequestRecord> = records
            .iter()
            .filter(|r| &r.model_version == version)
            .collect();

        let count = matching.len() as u64;

        let stats = if count == 0 {
            VersionStats::default()
        } else {
            let latencies: Vec<u64> = matching.iter().map(|r| r.latency_ms).collect();
            let positives = matching
                .iter()
                .filter(|r| r.is_positive(positive_class))
                .count() as u64;

            VersionStats {
                request_count: count,
                traffic_percentage: count as f64 / total as f64 * 100.0,
                churn_rate: positives as f64 / count as f64 * 100.0,
                latency: LatencyStats::from_samples(latencies),
            }
        };

        versions.insert(version.clone(), stats);
    }

    AggregateStats {
        total_requests: total,
        versions,
    }
}
