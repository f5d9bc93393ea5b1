//! Executor trait definition and shared error types.

use std::path::PathBuf;
use std::process::ExitStatus;

use uudev_core::DeviceSnapshot;

/// Errors that can occur while running an action.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to spawn {}: {source}", shell.display())]
    Spawn {
        shell: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for child: {0}")]
    Wait(#[source] std::io::Error),
}

/// One aggregated script ready to run.
#[derive(Debug, Clone)]
pub struct ExecutionRequest<'a> {
    /// Device that triggered the run; `None` for the startup run.
    pub device: Option<&'a DeviceSnapshot>,
    /// Concatenated rule bodies, passed to the interpreter unchanged.
    pub text: Vec<u8>,
    /// Headers of the rules that contributed, for diagnostics.
    pub headers: Vec<String>,
}

/// Runs one aggregated script to completion.
pub trait Executor {
    /// Run the request and block until it finishes.
    fn run(&mut self, request: &ExecutionRequest<'_>) -> Result<ExitStatus, ExecError>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}
