//! Fixed-response model slot
//!
//! Serves a canned prediction for every profile. Used as the test double
//! throughout this crate and as a stand-in slot when wiring a canary before
//! real artifacts are promoted.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::model::{CustomerProfile, ModelInfo, ModelSlot, PredictionOutcome};
use crate::domain::policy::ModelVersion;
use crate::domain::DomainError;

/// A model slot returning fixed class probabilities
#[derive(Debug)]
pub struct StaticModelSlot {
    version: ModelVersion,
    class_probabilities: Vec<f64>,
    info: ModelInfo,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl StaticModelSlot {
    /// Create a slot that always predicts with the given class probabilities
    pub fn new(version: ModelVersion, class_probabilities: Vec<f64>) -> Self {
        let info = ModelInfo::new(version.clone());
        Self {
            version,
            class_probabilities,
            info,
            delay: None,
            failure: None,
        }
    }

    /// Create a slot that fails every prediction with the given message
    pub fn failing(version: ModelVersion, message: impl Into<String>) -> Self {
        let info = ModelInfo::new(version.clone());
        Self {
            version,
            class_probabilities: Vec::new(),
            info,
            delay: None,
            failure: Some(message.into()),
        }
    }

    /// Attach a training-time metric to the slot's info
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.info = self.info.with_metric(name, value);
        self
    }

    /// Simulate inference cost by sleeping before responding
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn predicted_label(&self) -> usize {
        self.class_probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

#[async_trait]
impl ModelSlot for StaticModelSlot {
    fn version(&self) -> &ModelVersion {
        &self.version
    }

    fn info(&self) -> ModelInfo {
        self.info.clone()
    }

    async fn predict(&self, _profile: &CustomerProfile) -> Result<PredictionOutcome, DomainError> {
        if let Some(ref message) = self.failure {
            return Err(DomainError::prediction(message.clone()));
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(PredictionOutcome::new(
            self.predicted_label(),
            self.class_probabilities.clone(),
        ))
    }
}
