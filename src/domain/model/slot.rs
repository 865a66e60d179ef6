//! Model slot trait and metadata types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use super::prediction::{CustomerProfile, PredictionOutcome};
use crate::domain::policy::ModelVersion;
use crate::domain::DomainError;

/// Metadata about a deployed model version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Version identifier for this model
    pub model_version: ModelVersion,
    /// Offline evaluation metrics recorded at training time
    /// (e.g. accuracy, precision, recall, roc_auc)
    pub metrics: HashMap<String, f64>,
}

impl ModelInfo {
    /// Create model info with no metrics
    pub fn new(model_version: ModelVersion) -> Self {
        Self {
            model_version,
            metrics: HashMap::new(),
        }
    }

    /// Attach a training-time metric
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}

/// A versioned prediction capability.
///
/// Slots are materialized elsewhere (artifact loading is not this crate's
/// concern) and registered with the
/// [`ModelRegistry`](crate::infrastructure::ModelRegistry), which owns them
/// for their lifetime. Implementations must be safe to call concurrently;
/// the registry never mutates a slot in place, it swaps the reference.
#[async_trait]
pub trait ModelSlot: Send + Sync + Debug {
    /// The version this slot serves
    fn version(&self) -> &ModelVersion;

    /// Metadata and training-time metrics for this model
    fn info(&self) -> ModelInfo;

    /// Score a customer profile.
    ///
    /// Fails with [`DomainError::Prediction`] on malformed input the model
    /// cannot score; the router propagates the failure without recording an
    /// outcome and never retries.
    async fn predict(&self, profile: &CustomerProfile) -> Result<PredictionOutcome, DomainError>;
}
