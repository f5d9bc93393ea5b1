//! Rule and rule set types.

use std::io;
use std::ops::Deref;

use super::predicate::Predicate;

/// Flags and predicate compiled from one header line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledHeader {
    pub predicate: Predicate,
    /// Also run once at daemon startup.
    pub immediate: bool,
    /// Contributes text but never authorizes a run by itself.
    pub preamble: bool,
}

/// A compiled header paired with the command body declared under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub predicate: Predicate,
    /// Header line as written, for diagnostics.
    pub header: String,
    /// Verbatim body bytes, every line terminated by `\n`. Never empty.
    pub body: Vec<u8>,
    pub immediate: bool,
    pub preamble: bool,
    /// 1-based line number of the header.
    pub line: usize,
}

impl Rule {
    pub fn new(compiled: CompiledHeader, header: impl Into<String>, body: impl Into<Vec<u8>>, line: usize) -> Self {
        Self {
            predicate: compiled.predicate,
            header: header.into(),
            body: body.into(),
            immediate: compiled.immediate,
            preamble: compiled.preamble,
            line,
        }
    }
}

/// Rules in file declaration order. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build a rule set, dropping any rule whose body is empty.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules: rules.into_iter().filter(|r| !r.body.is_empty()).collect(),
        }
    }

    /// Write each rule as `header`, body, separator.
    pub fn dump(&self, out: &mut impl io::Write) -> io::Result<()> {
        for rule in &self.rules {
            writeln!(out, "{}", rule.header)?;
            out.write_all(&rule.body)?;
            writeln!(out, "{}", SEPARATOR)?;
        }
        Ok(())
    }
}

impl Deref for RuleSet {
    type Target = [Rule];

    fn deref(&self) -> &[Rule] {
        &self.rules
    }
}

/// Separator line used by configuration and device dumps.
pub const SEPARATOR: &str = "----------------------------------------------";
