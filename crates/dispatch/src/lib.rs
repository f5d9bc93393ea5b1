//! Event dispatch and action execution.
//!
//! This crate provides:
//! - `Executor` trait for pluggable action runners
//! - `ShellExecutor`, which feeds aggregated rule bodies to `/bin/sh` on stdin
//! - `Dispatcher`, which runs the startup phase and the event loop

pub mod dispatcher;
pub mod shell;
pub mod traits;

pub use dispatcher::{Dispatch, Dispatcher};
pub use shell::ShellExecutor;
pub use traits::{ExecError, ExecutionRequest, Executor};
