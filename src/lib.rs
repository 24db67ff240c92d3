//! Configuration reload gate for a generated reverse-proxy setup.
//!
//! # Architecture Overview
//!
//! ```text
//!   upstream state changes          ┌──────────────────────────────────────┐
//!   (services, endpoints, rules)    │            PROXY CONTROLLER          │
//!          │                        │                                      │
//!          ▼                        │  ┌─────────┐      ┌──────────────┐   │
//!   external builder ──────────────▶│  │ reload/ │─────▶│    model/    │   │
//!   renders snapshot (JSON)         │  │ watcher │      │  equivalence │   │
//!                                   │  └────┬────┘      └──────┬───────┘   │
//!                                   │       │                  │           │
//!                                   │       ▼                  ▼           │
//!                                   │  ┌─────────┐      equivalent? ──yes──┼──▶ suppress
//!                                   │  │ reload/ │◀────────── no           │
//!                                   │  │  gate   │                         │
//!                                   │  └────┬────┘                         │
//!                                   │       ▼                              │
//!                                   │  reload hook ────────────────────────┼──▶ live proxy
//!                                   │                                      │    process
//!                                   │  ┌────────────────────────────────┐  │
//!                                   │  │ config/ · observability/       │  │
//!                                   │  └────────────────────────────────┘  │
//!                                   └──────────────────────────────────────┘
//! ```
//!
//! The model subsystem decides *equivalence, not identity*: two snapshots
//! built from different upstream object instances compare equal whenever
//! they produce the same effective proxy behavior, and the gate turns that
//! decision into reload-or-suppress.

// Core subsystems
pub mod model;
pub mod reload;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use config::ControllerConfig;
pub use model::{Configuration, Equivalence};
pub use reload::{CommandReloader, ReloadGate, ReloadOutcome, SnapshotWatcher};
