//! Routing infrastructure: selection strategies and the traffic splitter

mod splitter;
mod strategy;

pub use splitter::TrafficSplitter;
pub use strategy::{SelectionStrategy, StickyHash, WeightedRandom};
