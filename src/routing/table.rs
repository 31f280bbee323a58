//! Hot-swappable handle to the active route matcher.
//!
//! Readers take an `Arc` snapshot and keep it for as long as they need;
//! reload builds a complete new matcher and publishes it atomically. An
//! in-flight lookup never observes a partially applied configuration.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::config::RouterConfig;
use crate::observability::metrics;
use crate::routing::error::RouteError;
use crate::routing::router::RouteMatcher;

/// Shared, atomically replaceable route matcher.
#[derive(Debug)]
pub struct RouteTable {
    current: ArcSwap<RouteMatcher>,
}

impl RouteTable {
    pub fn new(matcher: RouteMatcher) -> Self {
        metrics::set_route_count(matcher.len());
        Self {
            current: ArcSwap::from_pointee(matcher),
        }
    }

    /// Build the initial table from configuration.
    pub fn from_config(config: &RouterConfig) -> Result<Self, RouteError> {
        Ok(Self::new(RouteMatcher::from_config(&config.routes)?))
    }

    /// Snapshot of the active matcher.
    pub fn load(&self) -> Arc<RouteMatcher> {
        self.current.load_full()
    }

    /// Publish a matcher, returning the one it replaced.
    pub fn store(&self, matcher: RouteMatcher) -> Arc<RouteMatcher> {
        metrics::set_route_count(matcher.len());
        self.current.swap(Arc::new(matcher))
    }

    /// Rebuild from `config` and publish. On error the active matcher is kept.
    pub fn reload(&self, config: &RouterConfig) -> Result<(), RouteError> {
        match RouteMatcher::from_config(&config.routes) {
            Ok(matcher) => {
                let routes = matcher.len();
                self.store(matcher);
                metrics::record_reload(true);
                tracing::info!(routes, "Route table reloaded");
                Ok(())
            }
            Err(e) => {
                metrics::record_reload(false);
                tracing::error!(error = %e, "Route table reload rejected, keeping current routes");
                Err(e)
            }
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(RouteMatcher::default())
    }
}
