//! Traffic policy validation utilities

use thiserror::Error;

/// Maximum length for model version identifiers
pub const MAX_VERSION_LENGTH: usize = 50;

/// Tolerance for the weight-sum invariant. Weights must sum to 1.0 within
/// this epsilon; a policy outside the band is rejected, never normalized.
pub const WEIGHT_SUM_EPSILON: f64 = 0.01;

/// Validation errors for traffic policies and model versions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyValidationError {
    #[error("Model version cannot be empty")]
    EmptyVersion,

    #[error("Model version exceeds maximum length of {0} characters")]
    VersionTooLong(usize),

    #[error("Model version contains invalid character: '{0}'")]
    InvalidVersionCharacter(char),

    #[error("Traffic policy must contain at least one version")]
    EmptyPolicy,

    #[error("Duplicate version in traffic policy: '{0}'")]
    DuplicateVersion(String),

    #[error("Weight for version '{0}' must be a finite number")]
    NonFiniteWeight(String),

    #[error("Weight for version '{0}' cannot be negative")]
    NegativeWeight(String),

    #[error("Traffic weights must sum to 1.0, got {0}")]
    InvalidWeightSum(f64),
}

/// Validate a model version identifier
pub fn validate_version(version: &str) -> Result<(), PolicyValidationError> {
    if version.is_empty() {
        return Err(PolicyValidationError::EmptyVersion);
    }

    if version.len() > MAX_VERSION_LENGTH {
        return Err(PolicyValidationError::VersionTooLong(MAX_VERSION_LENGTH));
    }

    for ch in version.chars() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '.' && ch != '_' {
            return Err(PolicyValidationError::InvalidVersionCharacter(ch));
        }
    }

    Ok(())
}

/// Validate a single traffic weight
pub fn validate_weight(version: &str, weight: f64) -> Result<(), PolicyValidationError> {
    if !weight.is_finite() {
        return Err(PolicyValidationError::NonFiniteWeight(version.to_string()));
    }

    if weight < 0.0 {
        return Err(PolicyValidationError::NegativeWeight(version.to_string()));
    }

    Ok(())
}

/// Validate that weights sum to 1.0 within [`WEIGHT_SUM_EPSILON`]
pub fn validate_weight_sum(total: f64) -> Result<(), PolicyValidationError> {
    if (total - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(PolicyValidationError::InvalidWeightSum(total));
    }

    Ok(())
}
