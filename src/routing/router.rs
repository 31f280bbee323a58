//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in configuration order
//! - Look up the first route matching the request metadata
//! - Return the resolved route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in declared order; order decides which rule wins
//! - Explicit `None` rather than a silent default cluster

use crate::config::RouteRuleConfig;
use crate::observability::metrics;
use crate::routing::entry::{ResolvedRoute, RouteEntry};
use crate::routing::error::RouteError;
use crate::routing::metadata::Metadata;

/// Ordered set of routing rules.
#[derive(Debug, Default)]
pub struct RouteMatcher {
    routes: Vec<RouteEntry>,
}

impl RouteMatcher {
    /// Compile every rule. Fails as a whole if any rule is invalid.
    pub fn from_config(rules: &[RouteRuleConfig]) -> Result<Self, RouteError> {
        let routes = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| RouteEntry::new(index, rule))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(routes = routes.len(), "Route matcher compiled");
        Ok(Self { routes })
    }

    /// Find the first rule matching `metadata` and resolve its cluster.
    ///
    /// `random_value` drives weighted selection; callers draw it per request.
    pub fn route(&self, metadata: &dyn Metadata, random_value: u64) -> Option<ResolvedRoute<'_>> {
        for entry in &self.routes {
            if let Some(resolved) = entry.matches(metadata, random_value) {
                tracing::debug!(
                    route = %resolved.route_name(),
                    cluster = %resolved.cluster_name(),
                    weighted = resolved.is_weighted(),
                    "Route matched"
                );
                metrics::record_decision(true);
                return Some(resolved);
            }
        }

        tracing::debug!(metadata = metadata.len(), "No route matched");
        metrics::record_decision(false);
        None
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::metadata::MetadataMap;

    #[test]
    fn test_empty_matcher_has_no_route() {
        let matcher = RouteMatcher::from_config(&[]).unwrap();
        assert!(matcher.is_empty());
        assert!(matcher.route(&MetadataMap::new().with("env", "prod"), 7).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = vec![
            RouteRuleConfig::to_cluster("first").named("first").when_exact("env", "prod"),
            RouteRuleConfig::to_cluster("second").named("second").when_exact("env", "prod"),
        ];
        let meta = MetadataMap::new().with("env", "prod");

        let matcher = RouteMatcher::from_config(&rules).unwrap();
        assert_eq!(matcher.route(&meta, 0).unwrap().cluster_name(), "first");

        let reversed: Vec<_> = rules.into_iter().rev().collect();
        let matcher = RouteMatcher::from_config(&reversed).unwrap();
        assert_eq!(matcher.route(&meta, 0).unwrap().cluster_name(), "second");
    }

    #[test]
    fn test_non_matching_order_is_irrelevant() {
        let rules = vec![
            RouteRuleConfig::to_cluster("x").when_exact("env", "dev"),
            RouteRuleConfig::to_cluster("y").when_exact("env", "qa"),
            RouteRuleConfig::to_cluster("prod").when_exact("env", "prod"),
        ];
        let meta = MetadataMap::new().with("env", "prod");
        let swapped = vec![rules[1].clone(), rules[0].clone(), rules[2].clone()];

        let a = RouteMatcher::from_config(&rules).unwrap();
        let b = RouteMatcher::from_config(&swapped).unwrap();
        assert_eq!(a.route(&meta, 0).unwrap().cluster_name(), "prod");
        assert_eq!(b.route(&meta, 0).unwrap().cluster_name(), "prod");
    }

    #[test]
    fn test_no_match() {
        let matcher = RouteMatcher::from_config(&[RouteRuleConfig::to_cluster("prod").when_exact("env", "prod")]).unwrap();
        assert_eq!(matcher.len(), 1);
        assert!(matcher.route(&MetadataMap::new().with("env", "staging"), 0).is_none());
    }

    #[test]
    fn test_construction_fails_as_a_whole() {
        let rules = vec![
            RouteRuleConfig::to_cluster("ok"),
            RouteRuleConfig::to_weighted([("a", 0)]).named("broken"),
        ];
        let err = RouteMatcher::from_config(&rules).unwrap_err();
        assert!(matches!(err, RouteError::InvalidRule { index: 1, ref route, .. } if route == "broken"));
    }
}
