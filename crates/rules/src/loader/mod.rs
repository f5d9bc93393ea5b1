//! Rule file loader.
//!
//! Streams a config file line by line into a [`RuleSet`](crate::schema::RuleSet).
//! A header that fails to compile drops only its own rule; the load fails
//! only when the file cannot be opened or read.

mod core;
mod error;


pub use self::core::RuleLoader;
pub use self::error::{LoadDiagnostic, LoadReport, LoadStatus, Result, RuleError};
