use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// File name looked up under the XDG and HOME config directories.
pub const CONF_NAME: &str = "uudev.conf";

const DEFAULT_SHELL: &str = "/bin/sh";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Treat an empty directory value as the current directory.
fn dir_or_dot(value: String) -> PathBuf {
    if value.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(value)
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rule file to load.
    pub conf_path: PathBuf,
    /// Interpreter that reads aggregated action scripts on stdin.
    pub shell: PathBuf,
}

impl Config {
    /// Build config from the process environment (call `load_dotenv()` first).
    ///
    /// An explicit path (the `-c` flag) takes precedence over every variable.
    pub fn from_env(explicit: Option<&Path>) -> Result<Self> {
        Self::resolve(explicit, env_opt)
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// Precedence: `explicit`, `UUDEV_CONF`, `$XDG_CONFIG_HOME/uudev.conf`,
    /// `$HOME/.config/uudev.conf`.
    pub fn resolve(explicit: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let conf_path = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Some(path) = lookup("UUDEV_CONF") {
            dir_or_dot(path)
        } else if let Some(dir) = lookup("XDG_CONFIG_HOME") {
            dir_or_dot(dir).join(CONF_NAME)
        } else if let Some(home) = lookup("HOME") {
            dir_or_dot(home).join(".config").join(CONF_NAME)
        } else {
            return Err(CoreError::NoConfigPath);
        };

        let shell = lookup("UUDEV_SHELL")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SHELL));

        Ok(Self { conf_path, shell })
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config resolved:");
        tracing::info!("  rules:  {}", self.conf_path.display());
        tracing::info!("  shell:  {}", self.shell.display());
    }
}
