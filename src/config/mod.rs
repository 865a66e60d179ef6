//! Configuration loading

mod router_config;

pub use router_config::{
    RouterConfig, RoutingConfig, StrategyKind, TelemetryConfig, TrafficConfig,
};
