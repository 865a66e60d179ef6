//! Model domain - the prediction capability contract
//!
//! A [`ModelSlot`] is an opaque, versioned predictor. The router only ever
//! sees this trait; how a slot scores a profile (trained classifier,
//! remote call, test double) is an implementation detail.

mod prediction;
mod slot;

pub use prediction::{CustomerProfile, PredictionOutcome};
pub use slot::{ModelInfo, ModelSlot};
