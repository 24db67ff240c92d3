//! Generated-configuration model subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream state (services, endpoints, ingress rules)
//!     → external builder renders a Configuration snapshot (JSON)
//!     → types.rs (immutable snapshot entities)
//!     → equality.rs (semantic equivalence against the applied snapshot)
//!     → reload gate: equivalent = skip, different = reload
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable: built once, compared, then applied or dropped
//! - Cross-entity references are captured identity tuples, never live handles
//! - Server and Location order is canonicalized by the builder and compared
//!   index-wise; backend, endpoint, and certificate-name collections are sets
//! - Equivalence is a total boolean predicate: no error channel, no panics

pub mod equality;
pub mod policies;
pub mod types;

pub use equality::{ordered_eq, unordered_eq, Equivalence};
pub use types::Configuration;
