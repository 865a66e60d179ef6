//! Infrastructure services

mod router_service;

pub use router_service::{ExperimentRouter, RoutedPrediction, DEFAULT_POSITIVE_CLASS};
