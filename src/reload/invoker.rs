//! Reload hook invocation.
//!
//! # Responsibilities
//! - Define the seam between the gate and the live proxy process
//! - Run the configured reload command with a timeout
//!
//! # Design Decisions
//! - The gate never knows how a reload happens; it only needs the seam
//! - An empty command is a valid setup: decisions are logged and counted
//!   without touching any process

use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::config::schema::ReloadConfig;
use crate::model::Configuration;

/// Errors from invoking the reload hook.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to spawn reload command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("reload command did not finish within {0} seconds")]
    TimedOut(u64),

    #[error("reload command exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },
}

/// Applies a committed snapshot to the live proxy.
///
/// Callers drive reloads from a single control loop, so the returned
/// futures carry no auto-trait bounds.
#[allow(async_fn_in_trait)]
pub trait Reloader {
    async fn reload(&self, config: &Configuration) -> Result<(), ReloadError>;
}

/// Reload hook that executes an external command.
pub struct CommandReloader {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandReloader {
    pub fn from_config(config: &ReloadConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl Reloader for CommandReloader {
    async fn reload(&self, _config: &Configuration) -> Result<(), ReloadError> {
        if self.command.is_empty() {
            tracing::info!("No reload command configured, skipping invocation");
            return Ok(());
        }

        tracing::debug!(command = %self.command, "Invoking reload command");
        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.command).args(&self.args).output(),
        )
        .await
        .map_err(|_| ReloadError::TimedOut(self.timeout.as_secs()))??;

        if !output.status.success() {
            return Err(ReloadError::Failed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}
