//! Infrastructure layer - Concrete routing, registry, and telemetry pieces

pub mod model;
pub mod recorder;
pub mod registry;
pub mod routing;
pub mod services;

pub use model::StaticModelSlot;
pub use recorder::{RequestRecorder, DEFAULT_MAX_RECORDS};
pub use registry::ModelRegistry;
pub use routing::{SelectionStrategy, StickyHash, TrafficSplitter, WeightedRandom};
pub use services::{ExperimentRouter, RoutedPrediction, DEFAULT_POSITIVE_CLASS};
