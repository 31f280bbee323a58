//! Route file watcher for hot reload.
//!
//! Raw filesystem events are only a hint that the file changed. A burst of
//! events (truncate, several writes, metadata updates) is coalesced until the
//! file has been quiet for the debounce window, then the file is loaded once.
//! A configuration equal to the last one published is not sent again.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::RouterConfig;

/// Quiet period required after the last file event before reloading.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches a route file and publishes validated, changed configurations.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path` and the receiver its updates arrive on.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                debounce: DEFAULT_DEBOUNCE,
                update_tx,
            },
            update_rx,
        )
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Start watching.
    ///
    /// Must be called inside a tokio runtime: the reload loop runs as a task
    /// and stops once the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    let _ = event_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Route file watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        // Baseline for change detection: whatever is on disk right now.
        let current = load_config(&self.path).ok();
        tokio::spawn(reload_loop(
            self.path.clone(),
            self.debounce,
            event_rx,
            self.update_tx,
            current,
        ));

        tracing::info!(path = ?self.path, debounce_ms = self.debounce.as_millis() as u64, "Route watcher started");
        Ok(watcher)
    }
}

/// Coalesce file events and publish each distinct valid configuration once.
async fn reload_loop(
    path: PathBuf,
    debounce: Duration,
    mut events: mpsc::UnboundedReceiver<()>,
    updates: mpsc::UnboundedSender<RouterConfig>,
    mut current: Option<RouterConfig>,
) {
    while events.recv().await.is_some() {
        let mut coalesced = 1usize;
        loop {
            match tokio::time::timeout(debounce, events.recv()).await {
                Ok(Some(())) => coalesced += 1,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        match load_config(&path) {
            Ok(config) if current.as_ref() == Some(&config) => {
                tracing::debug!(events = coalesced, "Route file unchanged, skipping reload");
            }
            Ok(config) => {
                tracing::info!(events = coalesced, routes = config.routes.len(), "Route file changed");
                current = Some(config.clone());
                if updates.send(config).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload routes, keeping current configuration");
            }
        }
    }
}
