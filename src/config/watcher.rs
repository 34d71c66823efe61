//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself, so editors
//! that save by writing a temporary file and renaming it over the original
//! are picked up too.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config_with, Overrides};
use crate::config::schema::RelayConfig;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    overrides: Overrides,
    current: RelayConfig,
    update_tx: mpsc::UnboundedSender<RelayConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// `current` is the configuration already in effect; reloads that produce
    /// the same configuration are not forwarded. Returns the watcher and a
    /// receiver for configuration updates.
    pub fn new(
        path: &Path,
        overrides: Overrides,
        current: RelayConfig,
    ) -> (Self, mpsc::UnboundedReceiver<RelayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
                overrides,
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are
    /// wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx;
        let path = self.path.clone();
        let overrides = self.overrides;
        let last = Mutex::new(self.current);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    if !event.paths.iter().any(|p| p == &path) {
                        return;
                    }
                    reload(&path, &overrides, &last, &tx);
                }
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload(
    path: &Path,
    overrides: &Overrides,
    last: &Mutex<RelayConfig>,
    tx: &mpsc::UnboundedSender<RelayConfig>,
) {
    let new_config = match load_config_with(path, overrides) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to reload config. Keeping current configuration."
            );
            return;
        }
    };

    let mut last = last.lock().expect("config watcher mutex poisoned");
    if *last == new_config {
        tracing::debug!(path = ?path, "Config file touched without changes");
        return;
    }
    tracing::info!(
        app_id = %new_config.metadata.app_id,
        default_color = %new_config.metadata.default_color,
        "Config file change detected, reloading"
    );
    *last = new_config.clone();
    let _ = tx.send(new_config);
}
