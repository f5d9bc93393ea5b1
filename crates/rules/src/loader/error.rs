//! Error types and load report structures for the rule loader.

use std::path::PathBuf;

use crate::compiler::SyntaxError;
use crate::schema::RuleSet;

/// Errors that abort a rule load.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Opening or reading the rule file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for rule operations.
pub type Result<T> = std::result::Result<T, RuleError>;

/// Outcome of loading a rule file.
#[derive(Debug)]
pub struct LoadReport {
    /// Rules that compiled and carry a body, in file order.
    pub rules: RuleSet,
    /// Headers that did not produce a rule.
    pub diagnostics: Vec<LoadDiagnostic>,
}

impl LoadReport {
    /// Diagnostics for headers that failed to compile.
    pub fn failures(&self) -> impl Iterator<Item = &LoadDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.status, LoadStatus::Failed { .. }))
    }
}

/// A header line that was not registered as a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDiagnostic {
    /// 1-based line number of the header.
    pub line: usize,
    pub status: LoadStatus,
}

/// Why a header line did not produce a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The header did not compile; its body was discarded.
    Failed { error: SyntaxError },
    /// The header compiled but no body followed it.
    EmptyBody,
}
