//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Decoded request metadata (key/value view) + caller's random draw
//!     → router.rs (walk rules in configured order)
//!     → entry.rs / matcher.rs (evaluate match conditions)
//!     → load_balancer::weighted (pick a cluster for weighted rules)
//!     → Return: ResolvedRoute or None
//!
//! Route Compilation (at load):
//!     RouteRuleConfig[]
//!     → validate each rule
//!     → compile matchers, mutations, hash policy
//!     → Freeze as immutable RouteMatcher
//!     → publish through RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at load, immutable at runtime
//! - Deterministic: same metadata + same random draw = same route
//! - First match wins, in declaration order

pub mod entry;
pub mod error;
pub mod hash_policy;
pub mod matcher;
pub mod metadata;
pub mod mutation;
pub mod router;
pub mod table;

pub use entry::{ClusterSpecifier, ResolvedRoute, RouteEntry};
pub use error::RouteError;
pub use hash_policy::HashPolicy;
pub use matcher::{AndMatcher, HeaderMatchKind, HeaderMatcher, Matcher};
pub use metadata::{Metadata, MetadataMap};
pub use mutation::{Mutation, MutationEntry};
pub use router::RouteMatcher;
pub use table::RouteTable;
