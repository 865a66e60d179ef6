//! Prediction input and outcome types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Structured input for a prediction: feature name -> value.
///
/// The router never interprets individual features; it hands the profile to
/// the selected [`ModelSlot`](super::ModelSlot) untouched. Feature
/// engineering and encoding live behind the slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerProfile {
    #[serde(flatten)]
    features: BTreeMap<String, Value>,
}

impl CustomerProfile {
    /// Create an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature value
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    /// Get a feature value by name
    pub fn feature(&self, name: &str) -> Option<&Value> {
        self.features.get(name)
    }

    /// Number of features in the profile
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Outcome of a single model invocation.
///
/// Carries the predicted class label and the per-class membership
/// probabilities; derived quantities (confidence, positive-class
/// probability) are computed here rather than trusted from the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Predicted class label, an index into `class_probabilities`
    pub label: usize,
    /// Class-membership probabilities, in class order, summing to 1.0
    pub class_probabilities: Vec<f64>,
}

impl PredictionOutcome {
    /// Create a new outcome
    pub fn new(label: usize, class_probabilities: Vec<f64>) -> Self {
        Self {
            label,
            class_probabilities,
        }
    }

    /// Confidence score: the maximum class probability
    pub fn confidence(&self) -> f64 {
        self.class_probabilities
            .iter()
            .copied()
            .fold(0.0, f64::max)
    }

    /// Probability of the positive class (0.0 if the index is out of range)
    pub fn positive_probability(&self, positive_class: usize) -> f64 {
        self.class_probabilities
            .get(positive_class)
            .copied()
            .unwrap_or(0.0)
    }

    /// Whether the predicted label is the positive class
    pub fn is_positive(&self, positive_class: usize) -> bool {
        self.label == positive_class
    }
}
