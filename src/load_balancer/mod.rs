//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Route matched → weighted cluster set identified
//!     → weighted.rs (map caller's random draw onto weight ranges)
//!     → Return: chosen WeightedClusterEntry
//! ```
//!
//! # Design Decisions
//! - Selection is stateless; the caller supplies the random draw
//! - Same draw + same list = same cluster (reproducible in tests)
//! - Endpoint selection inside the chosen cluster happens downstream

pub mod weighted;

pub use weighted::{pick_cluster, total_weight, WeightedClusterEntry};
