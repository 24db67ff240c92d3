//! Controller settings validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses before anything starts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the deserialized config
//! - Runs before a config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ControllerConfig;

/// A single semantic problem found in the controller settings.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("snapshot.path must not be empty")]
    EmptySnapshotPath,

    #[error("reload.timeout_secs must be greater than zero")]
    ZeroReloadTimeout,

    #[error("reload.args given without reload.command")]
    ArgsWithoutCommand,

    #[error("observability.metrics_address is not a valid socket address: {0}")]
    InvalidMetricsAddress(String),
}

/// Validate the controller settings, collecting every problem found.
pub fn validate_config(config: &ControllerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.snapshot.path.trim().is_empty() {
        errors.push(ValidationError::EmptySnapshotPath);
    }

    if config.reload.timeout_secs == 0 {
        errors.push(ValidationError::ZeroReloadTimeout);
    }

    if config.reload.command.is_empty() && !config.reload.args.is_empty() {
        errors.push(ValidationError::ArgsWithoutCommand);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
