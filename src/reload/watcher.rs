//! Snapshot document watcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::model::Configuration;

/// Errors from loading a rendered snapshot document.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load a rendered snapshot document from disk.
pub fn load_snapshot(path: &Path) -> Result<Configuration, SnapshotError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// A watcher that monitors the rendered snapshot document for changes.
pub struct SnapshotWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<Configuration>,
}

impl SnapshotWatcher {
    /// Create a new SnapshotWatcher.
    ///
    /// Returns the watcher and a receiver for parsed snapshots.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<Configuration>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the document in a background thread.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Snapshot change detected, loading...");
                        match load_snapshot(&path) {
                            Ok(snapshot) => {
                                let _ = tx.send(snapshot);
                            }
                            Err(e) => {
                                tracing::error!(
                                    "Failed to load snapshot: {}. Keeping current configuration.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Snapshot watcher started");
        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Equivalence;

    #[test]
    fn test_load_snapshot_round_trip() {
        let cfg = Configuration {
            backends: vec![],
            servers: vec![crate::model::types::Server {
                hostname: "example.com".into(),
                ..Default::default()
            }],
        };

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), serde_json::to_vec(&cfg).unwrap()).unwrap();

        let loaded = load_snapshot(file.path()).unwrap();
        assert!(cfg.equivalent(&loaded));
    }

    #[test]
    fn test_load_snapshot_rejects_garbage() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), b"not json").unwrap();
        assert!(matches!(
            load_snapshot(file.path()),
            Err(SnapshotError::Parse(_))
        ));
    }

    #[test]
    fn test_load_snapshot_accepts_partial_documents() {
        // The builder may omit empty sections; defaults fill them in.
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), br#"{"servers": []}"#).unwrap();
        let loaded = load_snapshot(file.path()).unwrap();
        assert!(loaded.backends.is_empty());
    }
}
