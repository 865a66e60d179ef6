use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::policy::{PolicyValidationError, TrafficPolicy};
use crate::infrastructure::routing::TrafficSplitter;

/// Router configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub traffic: TrafficConfig,
    pub routing: RoutingConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrafficConfig {
    /// Initial traffic split: model version -> weight. Must sum to 1.0.
    pub split: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Selection strategy for the splitter
    pub strategy: StrategyKind,
    /// Fixed random seed; unset means entropy-seeded
    pub seed: Option<u64>,
    /// Class label treated as the positive (churn) outcome
    pub positive_class: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Independent weighted random draw per request
    #[default]
    Random,
    /// Consistent assignment by routing key
    Sticky,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Bound on retained request records
    pub max_records: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            traffic: TrafficConfig::default(),
            routing: RoutingConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            split: HashMap::from([("v1".to_string(), 0.5), ("v2".to_string(), 0.5)]),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            seed: None,
            positive_class: 1,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            max_records: crate::infrastructure::recorder::DEFAULT_MAX_RECORDS,
        }
    }
}

impl RouterConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("CHURN_ROUTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Build the configured initial traffic policy.
    ///
    /// Config files hand the split over as an unordered map, so versions are
    /// sorted by identifier to give the policy a stable iteration order.
    pub fn initial_policy(&self) -> Result<TrafficPolicy, PolicyValidationError> {
        let mut entries: Vec<(&String, &f64)> = self.traffic.split.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        TrafficPolicy::from_weights(entries.into_iter().map(|(v, w)| (v.as_str(), *w)))
    }

    /// Build a traffic splitter for the configured strategy
    pub fn splitter(&self) -> TrafficSplitter {
        match (self.routing.strategy, self.routing.seed) {
            (StrategyKind::Random, Some(seed)) => TrafficSplitter::with_seed(seed),
            (StrategyKind::Random, None) => TrafficSplitter::weighted_random(),
            (StrategyKind::Sticky, _) => TrafficSplitter::sticky(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert_eq!(config.routing.strategy, StrategyKind::Random);
        assert_eq!(config.routing.positive_class, 1);
        assert_eq!(config.telemetry.max_records, 100_000);
    }

    #[test]
    fn test_default_policy_is_valid() {
        let config = RouterConfig::default();
        let policy = config.initial_policy().unwrap();
        assert_eq!(policy.len(), 2);

        let order: Vec<&str> = policy.versions().map(|v| v.as_str()).collect();
        assert_eq!(order, vec!["v1", "v2"]);
    }

    #[test]
    fn test_invalid_split_rejected() {
        let config = RouterConfig {
            traffic: TrafficConfig {
                split: HashMap::from([("v1".to_string(), 0.4), ("v2".to_string(), 0.4)]),
            },
            ..Default::default()
        };

        assert!(config.initial_policy().is_err());
    }
}
