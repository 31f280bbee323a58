//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing and config subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (decision counters, route gauge)
//!
//! Consumers:
//!     → Log aggregation (stderr, plain or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Per-request logs at debug level only; the lookup path stays quiet by default
//! - Metrics are cheap (atomic increments) and no-ops without an exporter

pub mod logging;
pub mod metrics;
