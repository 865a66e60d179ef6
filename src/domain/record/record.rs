//! Per-request outcome records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::policy::ModelVersion;

/// Unique identifier for a routed request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Create a request ID from a caller-supplied value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new unique ID
    pub fn generate() -> Self {
        Self(format!("req-{}", uuid::Uuid::new_v4()))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Telemetry for a single routed request.
///
/// Created only after a successful prediction (failed invocations leave no
/// record) and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Unique identifier for this request
    id: RequestId,
    /// When the request completed
    pub timestamp: DateTime<Utc>,
    /// Model version that served the request
    pub model_version: ModelVersion,
    /// Predicted class label
    pub label: usize,
    /// Probability of the positive (churn) class
    pub churn_probability: f64,
    /// Model invocation latency in milliseconds
    pub latency_ms: u64,
}

impl RequestRecord {
    /// Create a new record for a completed request
    pub fn new(id: impl Into<RequestId>, model_version: ModelVersion) -> Self {
        Self {
            id: id.into(),
            timestamp: Utc::now(),
            model_version,
            label: 0,
            churn_probability: 0.0,
            latency_ms: 0,
        }
    }

    /// Set the predicted label
    pub fn with_label(mut self, label: usize) -> Self {
        self.label = label;
        self
    }

    /// Set the positive-class probability
    pub fn with_churn_probability(mut self, probability: f64) -> Self {
        self.churn_probability = probability;
        self
    }

    /// Set the measured latency in milliseconds
    pub fn with_latency_ms(mut self, latency: u64) -> Self {
        self.latency_ms = latency;
        self
    }

    /// Set the completion timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Get the record ID
    pub fn id(&self) -> &RequestId {
        &self.id
    }

    /// Whether this record carries a positive (churn) label
    pub fn is_positive(&self, positive_class: usize) -> bool {
        self.label == positive_class
    }
}
