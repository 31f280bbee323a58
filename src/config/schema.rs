//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the meta router.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route rules, evaluated in the order they are declared.
    pub routes: Vec<RouteRuleConfig>,
}

/// One routing rule.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct RouteRuleConfig {
    /// Rule identifier for logging.
    #[serde(default)]
    pub name: Option<String>,

    /// Conditions the request metadata must satisfy.
    #[serde(default, rename = "match")]
    pub r#match: RouteMatchConfig,

    /// Where matching requests go.
    pub route: RouteActionConfig,

    /// Key/value pairs written into the request after routing.
    #[serde(default)]
    pub request_mutation: Vec<KeyValueConfig>,

    /// Key/value pairs written into the response.
    #[serde(default)]
    pub response_mutation: Vec<KeyValueConfig>,
}

/// Match conditions of a rule. An empty list matches everything.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouteMatchConfig {
    pub metadata: Vec<HeaderMatchConfig>,
}

/// A single metadata match condition.
///
/// Exactly one of `exact`, `regex`, `range`, `present`, `prefix`, `suffix`
/// or `contains` may be set. With none set the condition matches any value
/// of the named key, as long as the key is present.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct HeaderMatchConfig {
    /// Metadata key to inspect.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,

    /// Regular expression that must match the whole value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Half-open integer range `[start, end)`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,

    /// Negate the result of the condition.
    #[serde(default)]
    pub invert: bool,
}

/// Integer range for range matches.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct RangeConfig {
    pub start: i64,
    pub end: i64,
}

/// Cluster specifier and affinity settings of a rule.
///
/// Exactly one of `cluster` and `weighted_clusters` must be set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct RouteActionConfig {
    /// Single destination cluster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    /// Weighted destination set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_clusters: Option<WeightedClustersConfig>,

    /// Metadata keys feeding the affinity hash.
    #[serde(default)]
    pub hash_policy: Vec<String>,
}

/// Weighted destination set.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct WeightedClustersConfig {
    pub clusters: Vec<WeightedClusterConfig>,
}

/// One weighted destination.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WeightedClusterConfig {
    /// Cluster name.
    pub name: String,

    /// Relative weight. Required; kept optional here so that an omitted
    /// weight surfaces as a validation error instead of a parse error.
    #[serde(default)]
    pub weight: Option<u32>,
}

/// A configured key/value pair.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct KeyValueConfig {
    pub key: String,
    pub value: String,
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl RouteRuleConfig {
    /// Catch-all rule forwarding to a single cluster.
    pub fn to_cluster(cluster: impl Into<String>) -> Self {
        Self {
            route: RouteActionConfig {
                cluster: Some(cluster.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Catch-all rule splitting traffic over weighted clusters.
    pub fn to_weighted<I, S>(clusters: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let clusters = clusters
            .into_iter()
            .map(|(name, weight)| WeightedClusterConfig {
                name: name.into(),
                weight: Some(weight),
            })
            .collect();
        Self {
            route: RouteActionConfig {
                weighted_clusters: Some(WeightedClustersConfig { clusters }),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the rule name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Require `key` to equal `value` exactly.
    pub fn when_exact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.r#match.metadata.push(HeaderMatchConfig {
            name: key.into(),
            exact: Some(value.into()),
            ..Default::default()
        });
        self
    }

    /// Add a request mutation pair.
    pub fn with_request_mutation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_mutation.push(KeyValueConfig {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Add a response mutation pair.
    pub fn with_response_mutation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_mutation.push(KeyValueConfig {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Add a metadata key to the hash policy.
    pub fn with_hash_key(mut self, key: impl Into<String>) -> Self {
        self.route.hash_policy.push(key.into());
        self
    }
}
