//! Device rule engine.
//!
//! This crate provides:
//! - Header compilation of `* [!][?] KEY=="value",...` rule lines
//! - Line-oriented rule file loading with per-header error isolation
//! - Predicate evaluation and in-order aggregation of matched bodies

pub mod compiler;
pub mod evaluator;
pub mod loader;
pub mod schema;

pub use compiler::{compile, SyntaxError};
pub use evaluator::{Aggregate, RuleEvaluator};
pub use loader::{LoadReport, RuleLoader};
pub use schema::{Rule, RuleSet};
