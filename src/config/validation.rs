//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce exactly one cluster specifier per rule
//! - Require a positive weight on every weighted cluster
//! - Reject match conditions that could never be evaluated (bad regex, empty range)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{HeaderMatchConfig, RouteRuleConfig, RouterConfig};
use crate::routing::matcher::full_match_regex;

/// A single semantic defect in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route {route}: one of `cluster` or `weighted_clusters` is required")]
    MissingClusterSpecifier { route: String },

    #[error("route {route}: `cluster` and `weighted_clusters` are mutually exclusive")]
    ConflictingClusterSpecifier { route: String },

    #[error("route {route}: cluster name must not be empty")]
    EmptyClusterName { route: String },

    #[error("route {route}: `weighted_clusters` must list at least one cluster")]
    EmptyWeightedClusters { route: String },

    #[error("route {route}: weighted cluster `{cluster}` is missing required field `weight`")]
    MissingWeight { route: String, cluster: String },

    #[error("route {route}: weighted cluster `{cluster}` must have a positive weight")]
    ZeroWeight { route: String, cluster: String },

    #[error("route {route}: match condition has an empty name")]
    EmptyMatchName { route: String },

    #[error("route {route}: match condition on `{name}` sets more than one match kind")]
    ConflictingMatchKinds { route: String, name: String },

    #[error("route {route}: invalid regex for `{name}`: {reason}")]
    InvalidRegex {
        route: String,
        name: String,
        reason: String,
    },

    #[error("route {route}: range [{start}, {end}) for `{name}` is empty")]
    InvalidRange {
        route: String,
        name: String,
        start: i64,
        end: i64,
    },

    #[error("route {route}: hash policy keys must not be empty")]
    EmptyHashKey { route: String },

    #[error("route {route}: mutation keys must not be empty")]
    EmptyMutationKey { route: String },
}

/// Validate a whole configuration, collecting every error.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = config
        .routes
        .iter()
        .enumerate()
        .flat_map(|(index, rule)| validate_rule(index, rule))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate one rule. `index` is its position in the rule list.
pub fn validate_rule(index: usize, rule: &RouteRuleConfig) -> Vec<ValidationError> {
    let route = rule_label(index, rule);
    let mut errors = Vec::new();

    match (&rule.route.cluster, &rule.route.weighted_clusters) {
        (None, None) => errors.push(ValidationError::MissingClusterSpecifier {
            route: route.clone(),
        }),
        (Some(_), Some(_)) => errors.push(ValidationError::ConflictingClusterSpecifier {
            route: route.clone(),
        }),
        (Some(cluster), None) => {
            if cluster.is_empty() {
                errors.push(ValidationError::EmptyClusterName {
                    route: route.clone(),
                });
            }
        }
        (None, Some(weighted)) => {
            if weighted.clusters.is_empty() {
                errors.push(ValidationError::EmptyWeightedClusters {
                    route: route.clone(),
                });
            }
            for cluster in &weighted.clusters {
                if cluster.name.is_empty() {
                    errors.push(ValidationError::EmptyClusterName {
                        route: route.clone(),
                    });
                }
                match cluster.weight {
                    None => errors.push(ValidationError::MissingWeight {
                        route: route.clone(),
                        cluster: cluster.name.clone(),
                    }),
                    Some(0) => errors.push(ValidationError::ZeroWeight {
                        route: route.clone(),
                        cluster: cluster.name.clone(),
                    }),
                    Some(_) => {}
                }
            }
        }
    }

    for condition in &rule.r#match.metadata {
        validate_condition(&route, condition, &mut errors);
    }

    if rule.route.hash_policy.iter().any(|key| key.is_empty()) {
        errors.push(ValidationError::EmptyHashKey {
            route: route.clone(),
        });
    }

    if rule
        .request_mutation
        .iter()
        .chain(rule.response_mutation.iter())
        .any(|kv| kv.key.is_empty())
    {
        errors.push(ValidationError::EmptyMutationKey { route });
    }

    errors
}

fn validate_condition(route: &str, condition: &HeaderMatchConfig, errors: &mut Vec<ValidationError>) {
    if condition.name.is_empty() {
        errors.push(ValidationError::EmptyMatchName {
            route: route.to_string(),
        });
    }

    let kinds = [
        condition.exact.is_some(),
        condition.regex.is_some(),
        condition.range.is_some(),
        condition.present.is_some(),
        condition.prefix.is_some(),
        condition.suffix.is_some(),
        condition.contains.is_some(),
    ];
    if kinds.iter().filter(|set| **set).count() > 1 {
        errors.push(ValidationError::ConflictingMatchKinds {
            route: route.to_string(),
            name: condition.name.clone(),
        });
    }

    if let Some(pattern) = &condition.regex {
        if let Err(e) = full_match_regex(pattern) {
            errors.push(ValidationError::InvalidRegex {
                route: route.to_string(),
                name: condition.name.clone(),
                reason: e.to_string(),
            });
        }
    }

    if let Some(range) = condition.range {
        if range.start >= range.end {
            errors.push(ValidationError::InvalidRange {
                route: route.to_string(),
                name: condition.name.clone(),
                start: range.start,
                end: range.end,
            });
        }
    }
}

/// Human-readable label for a rule: its name, or `#<index>` when unnamed.
pub fn rule_label(index: usize, rule: &RouteRuleConfig) -> String {
    match &rule.name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => format!("#{}", index),
    }
}
