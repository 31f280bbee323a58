//! A single compiled routing rule.
//!
//! # Responsibilities
//! - Compile one rule's conditions, cluster specifier, mutations and hash policy
//! - Evaluate the conditions against request metadata
//! - Resolve the destination cluster, via weighted selection when configured
//!
//! # Design Decisions
//! - Construction validates the whole rule first; a half-built entry never escapes
//! - The cluster specifier is an enum, so single and weighted modes cannot mix
//! - Resolution borrows the entry: a picked weighted cluster still reaches its
//!   parent's mutations and hash policy without owning it

use crate::config::validation::{rule_label, validate_rule};
use crate::config::RouteRuleConfig;
use crate::load_balancer::{pick_cluster, total_weight, WeightedClusterEntry};
use crate::routing::error::RouteError;
use crate::routing::hash_policy::HashPolicy;
use crate::routing::matcher::{AndMatcher, HeaderMatcher, Matcher};
use crate::routing::metadata::Metadata;
use crate::routing::mutation::{apply_mutations, Mutation, MutationEntry};

/// Destination of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSpecifier {
    Single(String),
    Weighted {
        clusters: Vec<WeightedClusterEntry>,
        total_weight: u64,
    },
}

/// One configured routing rule.
#[derive(Debug)]
pub struct RouteEntry {
    name: String,
    cluster: ClusterSpecifier,
    matcher: AndMatcher,
    request_mutation: Vec<MutationEntry>,
    response_mutation: Vec<MutationEntry>,
    hash_policy: Option<HashPolicy>,
}

impl RouteEntry {
    /// Compile the rule at position `index` of the configured list.
    pub fn new(index: usize, config: &RouteRuleConfig) -> Result<Self, RouteError> {
        let name = rule_label(index, config);

        let errors = validate_rule(index, config);
        if !errors.is_empty() {
            return Err(RouteError::InvalidRule {
                index,
                route: name,
                errors,
            });
        }

        let cluster = match (&config.route.cluster, &config.route.weighted_clusters) {
            (Some(cluster), None) => ClusterSpecifier::Single(cluster.clone()),
            (_, Some(weighted)) => {
                let clusters: Vec<WeightedClusterEntry> = weighted
                    .clusters
                    .iter()
                    .filter_map(WeightedClusterEntry::from_config)
                    .collect();
                let total_weight = total_weight(&clusters);
                tracing::debug!(
                    route = %name,
                    weighted_clusters = clusters.len(),
                    total_weight,
                    "Compiled weighted clusters"
                );
                ClusterSpecifier::Weighted {
                    clusters,
                    total_weight,
                }
            }
            // validate_rule requires exactly one specifier.
            (None, None) => unreachable!("route {} passed validation without a cluster", name),
        };

        let mut matchers: Vec<Box<dyn Matcher>> = Vec::with_capacity(config.r#match.metadata.len());
        for condition in &config.r#match.metadata {
            let matcher = HeaderMatcher::from_config(condition).map_err(|source| RouteError::Regex {
                route: name.clone(),
                name: condition.name.clone(),
                source,
            })?;
            matchers.push(Box::new(matcher));
        }

        Ok(Self {
            cluster,
            matcher: AndMatcher::new(matchers),
            request_mutation: config.request_mutation.iter().map(MutationEntry::from).collect(),
            response_mutation: config.response_mutation.iter().map(MutationEntry::from).collect(),
            hash_policy: HashPolicy::new(config.route.hash_policy.clone()),
            name,
        })
    }

    /// Rule name, or `#<index>` when the rule is unnamed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The single configured cluster; `None` for weighted rules.
    pub fn cluster_name(&self) -> Option<&str> {
        match &self.cluster {
            ClusterSpecifier::Single(name) => Some(name.as_str()),
            ClusterSpecifier::Weighted { .. } => None,
        }
    }

    pub fn is_weighted(&self) -> bool {
        matches!(self.cluster, ClusterSpecifier::Weighted { .. })
    }

    pub fn cluster_specifier(&self) -> &ClusterSpecifier {
        &self.cluster
    }

    /// Weighted candidates in configured order; empty for single-cluster rules.
    pub fn weighted_clusters(&self) -> &[WeightedClusterEntry] {
        match &self.cluster {
            ClusterSpecifier::Weighted { clusters, .. } => clusters.as_slice(),
            ClusterSpecifier::Single(_) => &[],
        }
    }

    /// Sum of weights; `None` for single-cluster rules.
    pub fn total_cluster_weight(&self) -> Option<u64> {
        match &self.cluster {
            ClusterSpecifier::Weighted { total_weight, .. } => Some(*total_weight),
            ClusterSpecifier::Single(_) => None,
        }
    }

    pub fn hash_policy(&self) -> Option<&HashPolicy> {
        self.hash_policy.as_ref()
    }

    /// True if every condition holds. A rule without conditions matches everything.
    pub fn headers_match(&self, metadata: &dyn Metadata) -> bool {
        if self.matcher.is_empty() {
            tracing::debug!(route = %self.name, "No metadata match conditions, rule matches");
            return true;
        }

        tracing::debug!(
            route = %self.name,
            conditions = self.matcher.len(),
            metadata = metadata.len(),
            "Evaluating match conditions"
        );
        if tracing::enabled!(tracing::Level::TRACE) {
            for (key, value) in metadata.iter() {
                tracing::trace!(route = %self.name, key, value, "Request metadata");
            }
        }

        self.matcher.matches(metadata)
    }

    /// Resolve the destination, using `random_value` for weighted rules.
    pub fn cluster_entry(&self, random_value: u64) -> Option<ResolvedRoute<'_>> {
        match &self.cluster {
            ClusterSpecifier::Single(cluster) => Some(ResolvedRoute {
                entry: self,
                cluster: cluster.as_str(),
                weighted: None,
            }),
            ClusterSpecifier::Weighted {
                clusters,
                total_weight,
            } => {
                let picked = pick_cluster(clusters, *total_weight, random_value)?;
                Some(ResolvedRoute {
                    entry: self,
                    cluster: picked.cluster_name(),
                    weighted: Some(picked),
                })
            }
        }
    }

    /// Match and resolve in one step.
    pub fn matches(&self, metadata: &dyn Metadata, random_value: u64) -> Option<ResolvedRoute<'_>> {
        if !self.headers_match(metadata) {
            tracing::debug!(route = %self.name, "Match conditions not satisfied");
            return None;
        }

        self.cluster_entry(random_value)
    }

    /// Apply the request mutations to `target`.
    pub fn request_mutation(&self, target: &mut Mutation) {
        apply_mutations(&self.request_mutation, target);
    }

    /// Apply the response mutations to `target`.
    pub fn response_mutation(&self, target: &mut Mutation) {
        apply_mutations(&self.response_mutation, target);
    }
}

/// Outcome of a successful match: the concrete cluster plus the owning rule.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRoute<'a> {
    entry: &'a RouteEntry,
    cluster: &'a str,
    weighted: Option<&'a WeightedClusterEntry>,
}

impl<'a> ResolvedRoute<'a> {
    /// The cluster that should receive the request.
    pub fn cluster_name(&self) -> &'a str {
        self.cluster
    }

    /// Name of the rule that matched.
    pub fn route_name(&self) -> &'a str {
        self.entry.name()
    }

    pub fn route_entry(&self) -> &'a RouteEntry {
        self.entry
    }

    /// The picked candidate, for weighted rules.
    pub fn weighted_cluster(&self) -> Option<&'a WeightedClusterEntry> {
        self.weighted
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted.is_some()
    }

    pub fn request_mutation(&self, target: &mut Mutation) {
        self.entry.request_mutation(target);
    }

    pub fn response_mutation(&self, target: &mut Mutation) {
        self.entry.response_mutation(target);
    }

    pub fn hash_policy(&self) -> Option<&'a HashPolicy> {
        self.entry.hash_policy()
    }

    /// Affinity key for `metadata`, if the rule has a hash policy and a field is set.
    pub fn hash_key(&self, metadata: &dyn Metadata) -> Option<u64> {
        self.hash_policy()?.generate_hash(metadata)
    }
}
