//! Traffic policy domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::validation::{
    validate_version, validate_weight, validate_weight_sum, PolicyValidationError,
};

// ============================================================================
// ModelVersion
// ============================================================================

/// Identifier for a deployed model version (e.g. "v1", "v2")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelVersion(String);

impl ModelVersion {
    /// Create a new model version with validation
    pub fn new(version: impl Into<String>) -> Result<Self, PolicyValidationError> {
        let version = version.into();
        validate_version(&version)?;
        Ok(Self(version))
    }

    /// Get the version as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelVersion {
    type Error = PolicyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModelVersion> for String {
    fn from(version: ModelVersion) -> Self {
        version.0
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ModelVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// TrafficPolicy
// ============================================================================

/// A validated traffic split: model version -> probability weight.
///
/// Versions keep their insertion order so that cumulative-weight selection is
/// reproducible with a seeded random source. Weights must sum to 1.0 within
/// a small epsilon at construction time; an invalid policy is rejected, never
/// silently normalized. A policy is immutable once built — replacing the
/// active policy is always a wholesale swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPolicy {
    splits: Vec<(ModelVersion, f64)>,
}

impl TrafficPolicy {
    /// Build a policy from (version, weight) pairs, validating the
    /// weight-sum invariant
    pub fn new(
        splits: impl IntoIterator<Item = (ModelVersion, f64)>,
    ) -> Result<Self, PolicyValidationError> {
        let splits: Vec<(ModelVersion, f64)> = splits.into_iter().collect();

        if splits.is_empty() {
            return Err(PolicyValidationError::EmptyPolicy);
        }

        let mut seen = HashSet::new();

        for (version, weight) in &splits {
            if !seen.insert(version.clone()) {
                return Err(PolicyValidationError::DuplicateVersion(
                    version.as_str().to_string(),
                ));
            }

            validate_weight(version.as_str(), *weight)?;
        }

        let total: f64 = splits.iter().map(|(_, w)| w).sum();
        validate_weight_sum(total)?;

        Ok(Self { splits })
    }

    /// Build a policy from raw string versions
    pub fn from_weights<'a>(
        weights: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Result<Self, PolicyValidationError> {
        let mut splits = Vec::new();

        for (version, weight) in weights {
            splits.push((ModelVersion::new(version)?, weight));
        }

        Self::new(splits)
    }

    /// A policy sending all traffic to a single version
    pub fn single(version: ModelVersion) -> Self {
        Self {
            splits: vec![(version, 1.0)],
        }
    }

    /// Versions in insertion order
    pub fn versions(&self) -> impl Iterator<Item = &ModelVersion> {
        self.splits.iter().map(|(v, _)| v)
    }

    /// (version, weight) pairs in insertion order
    pub fn splits(&self) -> &[(ModelVersion, f64)] {
        &self.splits
    }

    /// Weight assigned to a version, if present
    pub fn weight_of(&self, version: &ModelVersion) -> Option<f64> {
        self.splits
            .iter()
            .find(|(v, _)| v == version)
            .map(|(_, w)| *w)
    }

    /// Number of versions in the policy
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Map a point in [0, 1) to a version by cumulative weight.
    ///
    /// Iterates versions in insertion order, accumulating weight, and returns
    /// the first version whose cumulative weight reaches the point. Falls
    /// back to the last version if floating-point rounding leaves the point
    /// past the final cumulative sum.
    pub fn version_for_point(&self, point: f64) -> &ModelVersion {
        let mut cumulative = 0.0;

        for (version, weight) in &self.splits {
            cumulative += weight;

            if point < cumulative {
                return version;
            }
        }

        // Rounding fallback; splits is never empty post-validation.
        &self.splits[self.splits.len() - 1].0
    }
}
