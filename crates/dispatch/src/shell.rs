//! Shell executor.
//!
//! Spawns the interpreter with its stdin connected to a pipe, writes the
//! whole script, closes the pipe and waits for the child.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, warn};

use crate::traits::{ExecError, ExecutionRequest, Executor};

/// Runs aggregated scripts through a shell reading from stdin.
pub struct ShellExecutor {
    shell: PathBuf,
}

impl ShellExecutor {
    pub const DEFAULT_SHELL: &'static str = "/bin/sh";

    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self { shell: shell.into() }
    }

    pub fn shell(&self) -> &std::path::Path {
        &self.shell
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SHELL)
    }
}

impl Executor for ShellExecutor {
    fn run(&mut self, request: &ExecutionRequest<'_>) -> Result<ExitStatus, ExecError> {
        let mut cmd = Command::new(&self.shell);
        cmd.stdin(Stdio::piped());
        if let Some(dev) = request.device {
            for (key, value) in dev.env_overrides() {
                cmd.env(key, value);
            }
        }

        let mut child = cmd.spawn().map_err(|source| {
            warn!(shell = %self.shell.display(), error = %source, "failed to spawn action");
            ExecError::Spawn {
                shell: self.shell.clone(),
                source,
            }
        })?;

        debug!(pid = child.id(), rules = request.headers.len(), "spawned action");

        // Dropping stdin closes the write end so the shell sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&request.text) {
                debug!(error = %e, "action stopped reading its script");
            }
        }

        let status = child.wait().map_err(ExecError::Wait)?;
        if !status.success() {
            debug!(status = %status, "action exited unsuccessfully");
        }
        Ok(status)
    }

    fn name(&self) -> &str {
        "shell"
    }
}
