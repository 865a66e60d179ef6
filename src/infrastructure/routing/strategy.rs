//! Pluggable version-selection strategies
//!
//! The splitter delegates the actual choice to a [`SelectionStrategy`], so
//! the default random draw can be swapped for sticky hashing (or a seeded
//! generator in tests) without touching any caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::domain::policy::{ModelVersion, TrafficPolicy};

/// Strategy for picking a model version from a validated policy.
///
/// Implementations must be deterministic given the same policy and the same
/// internal state sequence; the policy's insertion order is the iteration
/// order for cumulative-weight selection.
pub trait SelectionStrategy: Send + Sync + Debug {
    /// Select a version for one request
    fn select(&self, policy: &TrafficPolicy, routing_key: Option<&str>) -> ModelVersion;
}

// ============================================================================
// WeightedRandom
// ============================================================================

/// Default strategy: an independent uniform draw in [0, 1) per request,
/// mapped through the policy's cumulative weights. Ignores the routing key.
#[derive(Debug)]
pub struct WeightedRandom {
    rng: Mutex<StdRng>,
}

impl WeightedRandom {
    /// Create a strategy seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a strategy with a fixed seed, for reproducible routing
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn draw(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen::<f64>(),
            // A poisoned rng lock only ever means a panic mid-draw; fall
            // back to a fresh generator rather than failing the request.
            Err(poisoned) => poisoned.into_inner().gen::<f64>(),
        }
    }
}

impl Default for WeightedRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for WeightedRandom {
    fn select(&self, policy: &TrafficPolicy, _routing_key: Option<&str>) -> ModelVersion {
        policy.version_for_point(self.draw()).clone()
    }
}

// ============================================================================
// StickyHash
// ============================================================================

/// Sticky strategy: hashes the routing key into [0, 1) so the same caller
/// lands on the same version for as long as the policy is unchanged.
/// Requests without a key fall back to a random draw.
#[derive(Debug)]
pub struct StickyHash {
    fallback: WeightedRandom,
}

impl StickyHash {
    /// Create a sticky strategy with an entropy-seeded fallback
    pub fn new() -> Self {
        Self {
            fallback: WeightedRandom::new(),
        }
    }

    /// Create a sticky strategy with a seeded fallback, for tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            fallback: WeightedRandom::with_seed(seed),
        }
    }

    /// Map a routing key to a stable point in [0, 1)
    fn point_for_key(key: &str) -> f64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish() as f64 / (u64::MAX as f64 + 1.0)
    }
}

impl Default for StickyHash {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionStrategy for StickyHash {
    fn select(&self, policy: &TrafficPolicy, routing_key: Option<&str>) -> ModelVersion {
        match routing_key {
            Some(key) => policy.version_for_point(Self::point_for_key(key)).clone(),
            None => self.fallback.select(policy, None),
        }
    }
}
