//! Compiled rule types.
//!
//! - `Clause` / `Predicate`: a conjunction of key tests against a device snapshot
//! - `Rule`: a predicate, its flags, and the raw command body it contributes
//! - `RuleSet`: rules in declaration order, immutable once loaded

mod predicate;
mod rule;

pub use predicate::*;
pub use rule::*;
