//! Traffic splitter over a pluggable selection strategy

use super::strategy::{SelectionStrategy, StickyHash, WeightedRandom};
use crate::domain::policy::{ModelVersion, TrafficPolicy};

/// Selects a model version per request according to a traffic policy.
///
/// The splitter itself is stateless apart from the strategy it wraps; the
/// policy arrives with every call so that an atomic policy swap in the
/// router is immediately visible here.
#[derive(Debug)]
pub struct TrafficSplitter {
    strategy: Box<dyn SelectionStrategy>,
}

impl TrafficSplitter {
    /// Splitter with the default per-request weighted random draw
    pub fn weighted_random() -> Self {
        Self {
            strategy: Box::new(WeightedRandom::new()),
        }
    }

    /// Weighted random splitter with a fixed seed, for reproducible tests
    pub fn with_seed(seed: u64) -> Self {
        Self {
            strategy: Box::new(WeightedRandom::with_seed(seed)),
        }
    }

    /// Splitter with sticky routing-key assignment
    pub fn sticky() -> Self {
        Self {
            strategy: Box::new(StickyHash::new()),
        }
    }

    /// Splitter with a caller-provided strategy
    pub fn with_strategy(strategy: Box<dyn SelectionStrategy>) -> Self {
        Self { strategy }
    }

    /// Select a version. The policy is validated at construction time and
    /// not re-checked here.
    pub fn select(&self, policy: &TrafficPolicy, routing_key: Option<&str>) -> ModelVersion {
        self.strategy.select(policy, routing_key)
    }
}

impl Default for TrafficSplitter {
    fn default() -> Self {
        Self::weighted_random()
    }
}
