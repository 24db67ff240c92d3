//! Controller settings subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ControllerConfig (validated, immutable)
//!     → shared with the watcher, gate, and observability setup
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once loaded; changing them means restarting
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ControllerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ReloadConfig;
pub use schema::SnapshotConfig;
