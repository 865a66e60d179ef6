//! Experiment router service
//!
//! Orchestrates a routed prediction end to end: pick a version from the
//! active traffic policy, invoke the model slot, record the outcome, return
//! the enriched result. Also the administrative surface for policy swaps,
//! model promotion, and live statistics.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::{CustomerProfile, ModelInfo, ModelSlot};
use crate::domain::policy::{ModelVersion, TrafficPolicy};
use crate::domain::record::{RequestId, RequestRecord};
use crate::domain::stats::{aggregate, AggregateStats};
use crate::domain::DomainError;
use crate::infrastructure::recorder::RequestRecorder;
use crate::infrastructure::registry::ModelRegistry;
use crate::infrastructure::routing::TrafficSplitter;

/// Default positive class index: class 1 is "will churn"
pub const DEFAULT_POSITIVE_CLASS: usize = 1;

/// The enriched result of one routed prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedPrediction {
    /// Unique identifier for this request
    pub request_id: RequestId,
    /// Model version that served the request
    pub model_version: ModelVersion,
    /// Predicted class label
    pub label: usize,
    /// Probability of the positive (churn) class
    pub churn_probability: f64,
    /// Whether the predicted label is the positive class
    pub will_churn: bool,
    /// Confidence score: the maximum class probability
    pub confidence: f64,
    /// Model invocation latency in milliseconds
    pub latency_ms: u64,
}

/// Routes prediction traffic across concurrently deployed model versions.
///
/// Holds the registry, recorder, and splitter by reference; its only mutable
/// state is the active policy, which is replaced wholesale under a write
/// lock so concurrent routes see either the old or the new policy in full.
/// `route` itself takes no lock across the model invocation.
#[derive(Debug)]
pub struct ExperimentRouter {
    registry: Arc<ModelRegistry>,
    recorder: Arc<RequestRecorder>,
    splitter: TrafficSplitter,
    policy: RwLock<Arc<TrafficPolicy>>,
    positive_class: usize,
}

impl ExperimentRouter {
    /// Create a router over the given registry and recorder
    pub fn new(
        registry: Arc<ModelRegistry>,
        recorder: Arc<RequestRecorder>,
        splitter: TrafficSplitter,
        policy: TrafficPolicy,
    ) -> Self {
        Self {
            registry,
            recorder,
            splitter,
            policy: RwLock::new(Arc::new(policy)),
            positive_class: DEFAULT_POSITIVE_CLASS,
        }
    }

    /// Override the positive class index
    pub fn with_positive_class(mut self, positive_class: usize) -> Self {
        self.positive_class = positive_class;
        self
    }

    // ========================================================================
    // Routing
    // ========================================================================

    /// Route one prediction request.
    ///
    /// Selects a version via the splitter, invokes the slot, and appends
    /// exactly one record on success. The measured latency brackets only the
    /// model invocation; selection and recording overhead are excluded. A
    /// failed prediction leaves no record behind.
    pub async fn route(
        &self,
        profile: &CustomerProfile,
        routing_key: Option<&str>,
    ) -> Result<RoutedPrediction, DomainError> {
        let request_id = RequestId::generate();
        let policy = self.current_policy()?;
        let selected = self.splitter.select(&policy, routing_key);

        let slot = self
            .registry
            .get(&selected)?
            .ok_or_else(|| DomainError::unknown_version(selected.as_str()))?;

        let started = Instant::now();
        let outcome = slot.predict(profile).await?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let churn_probability = outcome.positive_probability(self.positive_class);

        let record = RequestRecord::new(request_id.clone(), selected.clone())
            .with_label(outcome.label)
            .with_churn_probability(churn_probability)
            .with_latency_ms(latency_ms);

        self.recorder.append(record)?;

        debug!(
            request_id = %request_id,
            model_version = %selected,
            label = outcome.label,
            latency_ms,
            "Routed prediction"
        );

        Ok(RoutedPrediction {
            request_id,
            model_version: selected,
            label: outcome.label,
            churn_probability,
            will_churn: outcome.is_positive(self.positive_class),
            confidence: outcome.confidence(),
            latency_ms,
        })
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Atomically replace the active traffic policy.
    ///
    /// `TrafficPolicy` is validated at construction, so an invalid split can
    /// never reach this point; a rejected construction leaves the previous
    /// policy active.
    pub fn update_policy(&self, policy: TrafficPolicy) -> Result<(), DomainError> {
        let mut active = self
            .policy
            .write()
            .map_err(|e| DomainError::internal(format!("Failed to acquire write lock: {}", e)))?;

        *active = Arc::new(policy);
        info!(versions = active.len(), "Traffic policy updated");

        Ok(())
    }

    /// The currently active policy
    pub fn current_policy(&self) -> Result<Arc<TrafficPolicy>, DomainError> {
        let active = self
            .policy
            .read()
            .map_err(|e| DomainError::internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(Arc::clone(&active))
    }

    /// Register a model slot, replacing any slot for the same version
    pub fn register_model(&self, slot: Arc<dyn ModelSlot>) -> Result<(), DomainError> {
        let version = slot.version().clone();
        self.registry.register(slot)?;
        info!(model_version = %version, "Model registered");
        Ok(())
    }

    /// Unregister a model version; returns whether it was present
    pub fn unregister_model(&self, version: &ModelVersion) -> Result<bool, DomainError> {
        let removed = self.registry.unregister(version)?;

        if removed {
            info!(model_version = %version, "Model unregistered");
        }

        Ok(removed)
    }

    /// Metadata for every registered model
    pub fn model_info(&self) -> Result<Vec<ModelInfo>, DomainError> {
        self.registry.model_info()
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Descriptive statistics over the current record set.
    ///
    /// Known versions are the registered set plus any version the active
    /// policy references, so a version with zero traffic still shows up
    /// with zero counts.
    pub fn stats(&self) -> Result<AggregateStats, DomainError> {
        let records = self.recorder.snapshot()?;
        let mut known = self.registry.versions()?;

        let policy = self.current_policy()?;
        for version in policy.versions() {
            if !known.contains(version) {
                known.push(version.clone());
            }
        }

        Ok(aggregate(&records, &known, self.positive_class))
    }

    /// Atomically clear all recorded telemetry
    pub fn reset_stats(&self) -> Result<(), DomainError> {
        self.recorder.reset()?;
        info!("Request records reset");
        Ok(())
    }

    /// Number of records currently retained
    pub fn recorded_requests(&self) -> Result<usize, DomainError> {
        self.recorder.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::StaticModelSlot;
    use std::collections::HashSet;
    use std::time::Duration;

    fn version(v: &str) -> ModelVersion {
        ModelVersion::new(v).unwrap()
    }

    fn churn_slot(v: &str) -> Arc<dyn ModelSlot> {
        // Predicts churn (class 1) with 0.8 probability.
        Arc::new(StaticModelSlot::new(version(v), vec![0.2, 0.8]))
    }

    fn retain_slot(v: &str) -> Arc<dyn ModelSlot> {
        // Predicts no churn (class 0) with 0.9 probability.
        Arc::new(StaticModelSlot::new(version(v), vec![0.9, 0.1]))
    }

    fn router_with(
        slots: Vec<Arc<dyn ModelSlot>>,
        policy: TrafficPolicy,
        seed: u64,
    ) -> ExperimentRouter {
        let registry = Arc::new(ModelRegistry::new());

        for slot in slots {
            registry.register(slot).unwrap();
        }

        ExperimentRouter::new(
            registry,
            Arc::new(RequestRecorder::new()),
            TrafficSplitter::with_seed(seed),
            policy,
        )
    }

    #[tokio::test]
    async fn test_route_single_version_policy() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let router = router_with(vec![churn_slot("v1")], policy, 1);

        for _ in 0..5 {
            let result = router.route(&CustomerProfile::new(), None).await.unwrap();
            assert_eq!(result.model_version.as_str(), "v1");
            assert!(result.will_churn);
            assert!((result.churn_probability - 0.8).abs() < f64::EPSILON);
            assert!((result.confidence - 0.8).abs() < f64::EPSILON);
        }

        let snapshot = router.recorder.snapshot().unwrap();
        assert_eq!(snapshot.len(), 5);
        assert!(snapshot.iter().all(|r| r.model_version.as_str() == "v1"));
    }

    #[tokio::test]
    async fn test_route_unknown_version_leaves_no_record() {
        // Policy routes everything to v3, but only v1/v2 are registered.
        let policy = TrafficPolicy::from_weights([("v3", 1.0)]).unwrap();
        let router = router_with(vec![churn_slot("v1"), retain_slot("v2")], policy, 1);

        let result = router.route(&CustomerProfile::new(), None).await;

        match result {
            Err(DomainError::UnknownVersion { version }) => assert_eq!(version, "v3"),
            other => panic!("expected UnknownVersion, got {:?}", other),
        }

        assert_eq!(router.recorded_requests().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_route_prediction_failure_leaves_no_record() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let failing: Arc<dyn ModelSlot> =
            Arc::new(StaticModelSlot::failing(version("v1"), "bad input shape"));
        let router = router_with(vec![failing], policy, 1);

        let result = router.route(&CustomerProfile::new(), None).await;

        assert!(matches!(result, Err(DomainError::Prediction { .. })));
        assert_eq!(router.recorded_requests().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_latency_reflects_model_invocation() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let slow: Arc<dyn ModelSlot> = Arc::new(
            StaticModelSlot::new(version("v1"), vec![0.2, 0.8])
                .with_delay(Duration::from_millis(20)),
        );
        let router = router_with(vec![slow], policy, 1);

        let result = router.route(&CustomerProfile::new(), None).await.unwrap();
        assert!(result.latency_ms >= 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_routes_record_unique_ids() {
        let policy = TrafficPolicy::from_weights([("v1", 0.5), ("v2", 0.5)]).unwrap();
        let router = Arc::new(router_with(
            vec![churn_slot("v1"), retain_slot("v2")],
            policy,
            42,
        ));

        let mut handles = Vec::new();

        for _ in 0..100 {
            let router = Arc::clone(&router);
            handles.push(tokio::spawn(async move {
                router.route(&CustomerProfile::new(), None).await.unwrap()
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = router.recorder.snapshot().unwrap();
        assert_eq!(snapshot.len(), 100);

        let ids: HashSet<String> = snapshot
            .iter()
            .map(|r| r.id().as_str().to_string())
            .collect();
        assert_eq!(ids.len(), 100);
    }

    #[tokio::test]
    async fn test_update_policy_swaps_atomically() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let router = router_with(vec![churn_slot("v1"), retain_slot("v2")], policy, 7);

        router.route(&CustomerProfile::new(), None).await.unwrap();

        router
            .update_policy(TrafficPolicy::from_weights([("v2", 1.0)]).unwrap())
            .unwrap();

        let result = router.route(&CustomerProfile::new(), None).await.unwrap();
        assert_eq!(result.model_version.as_str(), "v2");
        assert!(!result.will_churn);
    }

    #[tokio::test]
    async fn test_stats_before_any_routing() {
        let policy = TrafficPolicy::from_weights([("v1", 0.5), ("v2", 0.5)]).unwrap();
        let router = router_with(vec![churn_slot("v1"), retain_slot("v2")], policy, 1);

        let stats = router.stats().unwrap();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.versions.len(), 2);
        assert_eq!(stats.version(&version("v1")).unwrap().request_count, 0);
    }

    #[tokio::test]
    async fn test_stats_include_policy_only_versions() {
        // v3 has traffic allocated but no registered slot yet; it must still
        // appear in the stats with zero counts.
        let policy = TrafficPolicy::from_weights([("v1", 0.999), ("v3", 0.001)]).unwrap();
        let router = router_with(vec![churn_slot("v1")], policy, 1);

        let stats = router.stats().unwrap();
        assert!(stats.version(&version("v3")).is_some());
    }

    #[tokio::test]
    async fn test_stats_after_routing() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let router = router_with(vec![churn_slot("v1")], policy, 1);

        for _ in 0..4 {
            router.route(&CustomerProfile::new(), None).await.unwrap();
        }

        let stats = router.stats().unwrap();
        assert_eq!(stats.total_requests, 4);

        let v1 = stats.version(&version("v1")).unwrap();
        assert_eq!(v1.request_count, 4);
        assert_eq!(v1.traffic_percentage, 100.0);
        assert_eq!(v1.churn_rate, 100.0);
    }

    #[tokio::test]
    async fn test_reset_stats() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let router = router_with(vec![churn_slot("v1")], policy, 1);

        for _ in 0..3 {
            router.route(&CustomerProfile::new(), None).await.unwrap();
        }

        router.reset_stats().unwrap();

        let stats = router.stats().unwrap();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(router.recorded_requests().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_split_converges_to_policy_weights() {
        let policy = TrafficPolicy::from_weights([("v1", 0.5), ("v2", 0.5)]).unwrap();
        let router = router_with(vec![churn_slot("v1"), retain_slot("v2")], policy, 42);

        for _ in 0..2000 {
            router.route(&CustomerProfile::new(), None).await.unwrap();
        }

        let stats = router.stats().unwrap();
        let v1_share = stats.version(&version("v1")).unwrap().traffic_percentage;
        assert!(
            (v1_share - 50.0).abs() < 5.0,
            "v1 share {} outside tolerance",
            v1_share
        );
    }

    #[tokio::test]
    async fn test_sticky_routing_key_pins_version() {
        let policy = TrafficPolicy::from_weights([("v1", 0.5), ("v2", 0.5)]).unwrap();
        let registry = Arc::new(ModelRegistry::new());
        registry.register(churn_slot("v1")).unwrap();
        registry.register(retain_slot("v2")).unwrap();

        let router = ExperimentRouter::new(
            registry,
            Arc::new(RequestRecorder::new()),
            TrafficSplitter::sticky(),
            policy,
        );

        let first = router
            .route(&CustomerProfile::new(), Some("customer-42"))
            .await
            .unwrap();

        for _ in 0..10 {
            let next = router
                .route(&CustomerProfile::new(), Some("customer-42"))
                .await
                .unwrap();
            assert_eq!(next.model_version, first.model_version);
        }
    }

    #[tokio::test]
    async fn test_register_and_unregister_model() {
        let policy = TrafficPolicy::from_weights([("v1", 1.0)]).unwrap();
        let router = router_with(vec![churn_slot("v1")], policy, 1);

        router.register_model(retain_slot("v2")).unwrap();
        assert_eq!(router.model_info().unwrap().len(), 2);

        assert!(router.unregister_model(&version("v2")).unwrap());
        assert_eq!(router.model_info().unwrap().len(), 1);

        // Routing still works against the remaining version.
        let result = router.route(&CustomerProfile::new(), None).await.unwrap();
        assert_eq!(result.model_version.as_str(), "v1");
    }
}
