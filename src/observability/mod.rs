//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gate and watcher produce:
//!     → tracing events (structured log lines with decision context)
//!     → metrics.rs (reload decision counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Logging init lives in main; this module owns the metrics exporter
//! - Counters only: the gate's job is a boolean decision, and the
//!   interesting signal is how often each branch is taken

pub mod metrics;
