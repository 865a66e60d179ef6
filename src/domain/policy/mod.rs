//! Traffic policy domain module
//!
//! A [`TrafficPolicy`] maps model versions to probability weights and is the
//! single input to routing decisions. Policies are validated on construction
//! and immutable afterwards; the active policy is only ever replaced
//! wholesale.

mod entity;
mod validation;

pub use entity::{ModelVersion, TrafficPolicy};
pub use validation::{PolicyValidationError, MAX_VERSION_LENGTH, WEIGHT_SUM_EPSILON};
