//! Churn Router
//!
//! Canary-serving router for churn prediction models, with support for:
//! - Weighted traffic splits across concurrently deployed model versions
//! - Sticky (routing-key) or per-request random assignment
//! - Per-request latency and outcome telemetry
//! - Live descriptive statistics per version
//!
//! The crate is a library: it exposes calls, not endpoints. A serving layer
//! owns transport, timeouts, and retry policy; this core owns the routing
//! decision, the model invocation bracket, and the telemetry it records.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::RouterConfig;
pub use domain::{
    aggregate, AggregateStats, CustomerProfile, DomainError, LatencyStats, ModelInfo, ModelSlot,
    ModelVersion, PolicyValidationError, PredictionOutcome, RequestId, RequestRecord,
    TrafficPolicy, VersionStats,
};
pub use infrastructure::{
    ExperimentRouter, ModelRegistry, RequestRecorder, RoutedPrediction, SelectionStrategy,
    StaticModelSlot, StickyHash, TrafficSplitter, WeightedRandom,
};

use std::sync::Arc;

/// Build a router from configuration: fresh registry, bounded recorder, and
/// the configured splitter and initial policy. Model slots are registered by
/// the caller once their artifacts are materialized.
pub fn build_router(config: &RouterConfig) -> Result<ExperimentRouter, DomainError> {
    let policy = config.initial_policy()?;

    let registry = Arc::new(ModelRegistry::new());
    let recorder = Arc::new(RequestRecorder::with_max_records(
        config.telemetry.max_records,
    ));

    Ok(
        ExperimentRouter::new(registry, recorder, config.splitter(), policy)
            .with_positive_class(config.routing.positive_class),
    )
}
