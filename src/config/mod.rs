//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → RouteMatcher::from_config (compiled rule list)
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → RouteTable::reload builds a fresh matcher
//!     → atomic swap of Arc<RouteMatcher>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Rule order in the file is the evaluation order
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    HeaderMatchConfig, KeyValueConfig, ObservabilityConfig, RangeConfig, RouteActionConfig,
    RouteMatchConfig, RouteRuleConfig, RouterConfig, WeightedClusterConfig, WeightedClustersConfig,
};
pub use validation::{validate_config, ValidationError};
