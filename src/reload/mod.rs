//! Reload gating subsystem.
//!
//! # Data Flow
//! ```text
//! rendered snapshot document (JSON)
//!     → watcher.rs (detect change, parse, hand off)
//!     → gate.rs (equivalence check against the applied snapshot)
//!         equivalent  → count a suppressed reload, keep the proxy running
//!         different   → invoker.rs (reload hook), swap the applied snapshot
//! ```
//!
//! # Design Decisions
//! - The gate is the only writer of the applied snapshot
//! - The applied snapshot is swapped only after the reload hook succeeds,
//!   so a failed reload is retried on the next commit
//! - A snapshot that fails to parse never reaches the gate; the current
//!   configuration stays in effect

pub mod gate;
pub mod invoker;
pub mod watcher;

pub use gate::{ReloadGate, ReloadOutcome};
pub use invoker::{CommandReloader, ReloadError, Reloader};
pub use watcher::{load_snapshot, SnapshotError, SnapshotWatcher};
