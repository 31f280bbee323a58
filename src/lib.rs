//! Request-to-cluster routing for a protocol-agnostic RPC proxy.
//!
//! Given the metadata a protocol codec extracted from a request, pick the
//! upstream cluster, optionally splitting traffic over weighted clusters and
//! computing an affinity hash key.

pub mod config;
pub mod load_balancer;
pub mod observability;
pub mod routing;

pub use config::RouterConfig;
pub use routing::{Metadata, MetadataMap, Mutation, ResolvedRoute, RouteError, RouteMatcher, RouteTable};
