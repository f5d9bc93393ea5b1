//! Core [`RuleLoader`] struct: line-oriented rule file loading.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::compiler::{compile, is_header};
use crate::schema::{CompiledHeader, Rule, RuleSet};

use super::error::{LoadDiagnostic, LoadReport, LoadStatus, Result, RuleError};

/// Loads a rule file into an ordered [`RuleSet`].
///
/// A line starting with `*` opens a rule; every other line, blank lines
/// included, is appended to the body of the most recently opened rule.
/// Lines before the first header belong to no rule.
pub struct RuleLoader {
    /// Rule file path, also used to label diagnostics.
    path: PathBuf,
}

/// A header whose body is still being read.
struct OpenRule {
    header: String,
    line: usize,
    /// `None` when the header failed to compile.
    compiled: Option<CompiledHeader>,
    body: Vec<u8>,
}

impl RuleLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the rule file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open and load the rule file.
    pub fn load(&self) -> Result<LoadReport> {
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let report = self.load_from(BufReader::new(file))?;
        info!(
            path = %self.path.display(),
            rules = report.rules.len(),
            failed = report.failures().count(),
            "loaded rules"
        );
        Ok(report)
    }

    /// Load rules from any buffered reader, labelling diagnostics with this
    /// loader's path.
    ///
    /// Body lines are kept as raw bytes: only the trailing `\n` is replaced,
    /// so a `\r` or non-UTF-8 byte reaches the interpreter unchanged.
    pub fn load_from(&self, mut reader: impl BufRead) -> Result<LoadReport> {
        let mut rules = Vec::new();
        let mut diagnostics = Vec::new();
        let mut open: Option<OpenRule> = None;
        let mut buf = Vec::new();
        let mut lineno = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| self.io_error(source))?;
            if read == 0 {
                break;
            }
            lineno += 1;
            let line = buf.strip_suffix(b"\n").unwrap_or(&buf[..]);

            if !is_header(line) {
                if let Some(rule) = open.as_mut() {
                    rule.body.extend_from_slice(line);
                    rule.body.push(b'\n');
                }
                continue;
            }

            if let Some(prev) = open.take() {
                self.close(prev, &mut rules, &mut diagnostics);
            }

            let header = String::from_utf8_lossy(line).into_owned();
            let compiled = match compile(&header) {
                Ok(compiled) => Some(compiled),
                Err(error) => {
                    warn!(
                        path = %self.path.display(),
                        line = lineno,
                        error = %error,
                        "skipping rule with invalid header"
                    );
                    diagnostics.push(LoadDiagnostic {
                        line: lineno,
                        status: LoadStatus::Failed { error },
                    });
                    None
                }
            };
            open = Some(OpenRule {
                header,
                line: lineno,
                compiled,
                body: Vec::new(),
            });
        }

        if let Some(last) = open.take() {
            self.close(last, &mut rules, &mut diagnostics);
        }

        Ok(LoadReport {
            rules: RuleSet::new(rules),
            diagnostics,
        })
    }

    /// Register a finished rule if it compiled and has a body.
    fn close(&self, open: OpenRule, rules: &mut Vec<Rule>, diagnostics: &mut Vec<LoadDiagnostic>) {
        let Some(compiled) = open.compiled else {
            return;
        };
        if open.body.is_empty() {
            debug!(path = %self.path.display(), line = open.line, "dropping rule with empty body");
            diagnostics.push(LoadDiagnostic {
                line: open.line,
                status: LoadStatus::EmptyBody,
            });
            return;
        }
        rules.push(Rule::new(compiled, open.header, open.body, open.line));
    }

    fn io_error(&self, source: std::io::Error) -> RuleError {
        RuleError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
