use thiserror::Error;

use super::policy::PolicyValidationError;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Policy validation error: {0}")]
    PolicyValidation(#[from] PolicyValidationError),

    #[error("Unknown model version: '{version}'")]
    UnknownVersion { version: String },

    #[error("Prediction error: {message}")]
    Prediction { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn unknown_version(version: impl Into<String>) -> Self {
        Self::UnknownVersion {
            version: version.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::Prediction {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_version_error() {
        let error = DomainError::unknown_version("v3");
        assert_eq!(error.to_string(), "Unknown model version: 'v3'");
    }

    #[test]
    fn test_prediction_error() {
        let error = DomainError::prediction("bad input shape");
        assert_eq!(error.to_string(), "Prediction error: bad input shape");
    }

    #[test]
    fn test_internal_error() {
        let error = DomainError::internal("lock poisoned");
        assert_eq!(error.to_string(), "Internal error: lock poisoned");
    }
}
