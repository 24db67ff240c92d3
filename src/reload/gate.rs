//! The reload gate.
//!
//! # Responsibilities
//! - Hold the currently applied snapshot
//! - Compare every incoming snapshot against it
//! - Trigger the reload hook only when behavior actually changed
//!
//! # Design Decisions
//! - Equivalent snapshots are dropped without touching the proxy; this is
//!   what keeps upstream churn from turning into reload storms
//! - The applied snapshot lives in an ArcSwapOption: commits swap it
//!   atomically and readers never block

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::model::{Configuration, Equivalence};
use crate::observability::metrics::{
    RELOADS_SKIPPED_TOTAL, RELOADS_TOTAL, RELOAD_FAILURES_TOTAL,
};
use crate::reload::invoker::{ReloadError, Reloader};

/// What a commit did with the incoming snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The snapshot was equivalent to the applied one; nothing happened.
    Unchanged,
    /// The snapshot differed; the proxy was reloaded and the snapshot applied.
    Reloaded,
}

/// Gates proxy reloads on semantic configuration changes.
pub struct ReloadGate<R> {
    applied: ArcSwapOption<Configuration>,
    reloader: R,
}

impl<R: Reloader> ReloadGate<R> {
    /// Create a gate with no applied snapshot; the first commit always reloads.
    pub fn new(reloader: R) -> Self {
        Self {
            applied: ArcSwapOption::empty(),
            reloader,
        }
    }

    /// The snapshot currently applied to the proxy, if any.
    pub fn applied(&self) -> Option<Arc<Configuration>> {
        self.applied.load_full()
    }

    /// Commit an incoming snapshot.
    ///
    /// Equivalent snapshots are discarded. Changed snapshots are applied only
    /// after the reload hook succeeds; on hook failure the previous snapshot
    /// stays applied and the next commit will compare against it again.
    pub async fn commit(&self, incoming: Arc<Configuration>) -> Result<ReloadOutcome, ReloadError> {
        let applied = self.applied.load();
        if let Some(current) = applied.as_ref() {
            if current.equivalent(&incoming) {
                tracing::debug!(
                    backends = incoming.backends.len(),
                    servers = incoming.servers.len(),
                    "Snapshot equivalent to applied configuration, reload suppressed"
                );
                metrics::counter!(RELOADS_SKIPPED_TOTAL).increment(1);
                return Ok(ReloadOutcome::Unchanged);
            }
        }
        drop(applied);

        if let Err(e) = self.reloader.reload(&incoming).await {
            tracing::error!(error = %e, "Reload hook failed, keeping applied configuration");
            metrics::counter!(RELOAD_FAILURES_TOTAL).increment(1);
            return Err(e);
        }

        tracing::info!(
            backends = incoming.backends.len(),
            servers = incoming.servers.len(),
            "Configuration changed, proxy reloaded"
        );
        metrics::counter!(RELOADS_TOTAL).increment(1);
        self.applied.store(Some(incoming));
        Ok(ReloadOutcome::Reloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingReloader {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingReloader {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl Reloader for CountingReloader {
        async fn reload(&self, _config: &Configuration) -> Result<(), ReloadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ReloadError::Failed {
                    code: 1,
                    stderr: "boom".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn snapshot(hostname: &str) -> Arc<Configuration> {
        use crate::model::types::Server;
        Arc::new(Configuration {
            backends: vec![],
            servers: vec![Server {
                hostname: hostname.into(),
                ..Server::default()
            }],
        })
    }

    #[tokio::test]
    async fn test_first_commit_reloads() {
        let gate = ReloadGate::new(CountingReloader::new(false));
        let outcome = gate.commit(snapshot("example.com")).await.unwrap();
        assert_eq!(outcome, ReloadOutcome::Reloaded);
        assert!(gate.applied().is_some());
    }

    #[tokio::test]
    async fn test_equivalent_commit_is_suppressed() {
        let gate = ReloadGate::new(CountingReloader::new(false));
        gate.commit(snapshot("example.com")).await.unwrap();

        let outcome = gate.commit(snapshot("example.com")).await.unwrap();
        assert_eq!(outcome, ReloadOutcome::Unchanged);
        assert_eq!(gate.reloader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_commit_reloads_again() {
        let gate = ReloadGate::new(CountingReloader::new(false));
        gate.commit(snapshot("example.com")).await.unwrap();

        let outcome = gate.commit(snapshot("other.example.com")).await.unwrap();
        assert_eq!(outcome, ReloadOutcome::Reloaded);
        assert_eq!(gate.reloader.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            gate.applied().unwrap().servers[0].hostname,
            "other.example.com"
        );
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_applied_snapshot() {
        let gate = ReloadGate::new(CountingReloader::new(true));
        assert!(gate.commit(snapshot("example.com")).await.is_err());
        assert!(gate.applied().is_none());
    }
}
