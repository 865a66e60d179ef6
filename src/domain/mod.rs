//! Domain layer - Core business logic and entities

pub mod error;
pub mod model;
pub mod policy;
pub mod record;
pub mod stats;

pub use error::DomainError;
pub use model::{CustomerProfile, ModelInfo, ModelSlot, PredictionOutcome};
pub use policy::{ModelVersion, PolicyValidationError, TrafficPolicy};
pub use record::{RequestId, RequestRecord};
pub use stats::{aggregate, AggregateStats, LatencyStats, VersionStats};
