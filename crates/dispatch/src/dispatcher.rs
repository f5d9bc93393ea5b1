//! Matches device events against the rule set and runs the result.
//!
//! Every rule is evaluated for every event; matched bodies are concatenated
//! in declaration order and handed to the executor as one script, at most
//! one child at a time. Failures are contained to the event that caused them.

use std::fmt;
use std::io::{self, Write};
use std::process::ExitStatus;

use tracing::{debug, info, warn};
use uudev_core::{DeviceSnapshot, DeviceSource, SourceEvent};
use uudev_rules::schema::SEPARATOR;
use uudev_rules::{RuleEvaluator, RuleSet};

use crate::traits::{ExecutionRequest, Executor};

/// What happened to one event (or to the startup phase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing runnable matched.
    Skipped,
    /// The aggregate ran to completion.
    Executed(ExitStatus),
    /// The aggregate could not be run.
    Failed,
}

/// Drives a rule set from a device source through an executor.
pub struct Dispatcher<E> {
    rules: RuleSet,
    executor: E,
    /// 0 silent, 1 events and matches, 2 device dumps, 3 script echo.
    verbosity: u8,
    out: Box<dyn Write>,
}

impl<E: Executor> Dispatcher<E> {
    /// Create a silent dispatcher writing diagnostics to stdout.
    pub fn new(rules: RuleSet, executor: E) -> Self {
        Self {
            rules,
            executor,
            verbosity: 0,
            out: Box::new(io::stdout()),
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Redirect operator diagnostics.
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run the startup phase, then dispatch events until the source closes.
    pub fn run(&mut self, source: &mut impl DeviceSource) -> uudev_core::Result<()> {
        self.startup();
        loop {
            match source.receive()? {
                SourceEvent::Device(dev) => {
                    self.dispatch(&dev);
                }
                SourceEvent::Pending => source.wait_ready()?,
                SourceEvent::Closed => {
                    info!("device source closed");
                    return Ok(());
                }
            }
        }
    }

    /// Run all immediate rules once, with no device environment.
    ///
    /// Immediate preambles contribute text but do not by themselves cause a run.
    pub fn startup(&mut self) -> Dispatch {
        let (headers, runnable, text) = {
            let agg = RuleEvaluator::startup(&self.rules);
            (agg.headers(), agg.runnable, agg.text)
        };
        if self.verbosity >= 1 {
            for header in &headers {
                self.note(|out| writeln!(out, "startup: {header}"));
            }
        }
        if !runnable {
            debug!(preambles = headers.len(), "no immediate rules to run at startup");
            return Dispatch::Skipped;
        }
        self.execute(None, headers, text)
    }

    /// Evaluate every rule against one device and run the aggregate if any
    /// non-preamble rule matched.
    pub fn dispatch(&mut self, dev: &DeviceSnapshot) -> Dispatch {
        if self.verbosity >= 1 {
            self.note(|out| writeln!(out, "* {dev}"));
            if self.verbosity >= 2 {
                self.note(|out| {
                    dev.dump(out)?;
                    writeln!(out, "{SEPARATOR}")
                });
            }
        }

        let (headers, runnable, text) = {
            let agg = RuleEvaluator::evaluate(&self.rules, dev);
            (agg.headers(), agg.runnable, agg.text)
        };
        if self.verbosity >= 1 {
            for header in &headers {
                self.note(|out| writeln!(out, "matched: {header}"));
            }
        }
        if !runnable {
            return Dispatch::Skipped;
        }
        self.execute(Some(dev), headers, text)
    }

    fn execute(&mut self, device: Option<&DeviceSnapshot>, headers: Vec<String>, text: Vec<u8>) -> Dispatch {
        let request = ExecutionRequest { device, text, headers };
        if self.verbosity >= 3 {
            self.note(|out| {
                out.write_all(&request.text)?;
                out.flush()
            });
        }

        let trigger = Trigger(device);
        match self.executor.run(&request) {
            Ok(status) => {
                debug!(
                    trigger = %trigger,
                    executor = self.executor.name(),
                    status = %status,
                    rules = request.headers.len(),
                    "action finished"
                );
                Dispatch::Executed(status)
            }
            Err(e) => {
                warn!(
                    trigger = %trigger,
                    executor = self.executor.name(),
                    error = %e,
                    "action failed to run"
                );
                Dispatch::Failed
            }
        }
    }

    /// Write operator diagnostics; a failed write is logged and otherwise ignored.
    fn note(&mut self, write: impl FnOnce(&mut Box<dyn Write>) -> io::Result<()>) {
        if let Err(e) = write(&mut self.out) {
            debug!(error = %e, "failed to write diagnostics");
        }
    }
}

/// Log label for the event that caused a run.
struct Trigger<'a>(Option<&'a DeviceSnapshot>);

impl fmt::Display for Trigger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dev) => write!(f, "{dev}"),
            None => f.write_str("startup"),
        }
    }
}
