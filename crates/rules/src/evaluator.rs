//! Rule matching and body aggregation.
//!
//! Every rule is evaluated on its own against the snapshot; matched bodies
//! are concatenated in declaration order. A non-preamble match makes the
//! aggregate runnable.

use uudev_core::DeviceSnapshot;

use crate::schema::{Rule, RuleSet};

// ── Aggregate ───────────────────────────────────────────────────────

/// Concatenated bodies of the rules selected for one event (or startup).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate<'a> {
    /// Contributing rules, in declaration order.
    pub rules: Vec<&'a Rule>,
    /// Bodies of `rules`, concatenated.
    pub text: Vec<u8>,
    /// At least one contributing rule is not a preamble.
    pub runnable: bool,
}

impl<'a> Aggregate<'a> {
    fn push(&mut self, rule: &'a Rule) {
        self.text.extend_from_slice(&rule.body);
        if !rule.preamble {
            self.runnable = true;
        }
        self.rules.push(rule);
    }

    /// Header lines of the contributing rules.
    pub fn headers(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.header.clone()).collect()
    }
}

// ── Rule evaluator ──────────────────────────────────────────────────

/// Selects and aggregates rules for the two dispatch phases.
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Aggregate every rule whose predicate matches `dev`.
    pub fn evaluate<'a>(rules: &'a RuleSet, dev: &DeviceSnapshot) -> Aggregate<'a> {
        let mut agg = Aggregate::default();
        for rule in rules.iter().filter(|r| r.predicate.matches(dev)) {
            agg.push(rule);
        }
        agg
    }

    /// Aggregate every immediate rule, ignoring predicates.
    pub fn startup(rules: &RuleSet) -> Aggregate<'_> {
        let mut agg = Aggregate::default();
        for rule in rules.iter().filter(|r| r.immediate) {
            agg.push(rule);
        }
        agg
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn rule(header: &str, body: &str) -> Rule {
        Rule::new(compile(header).unwrap(), header, body, 0)
    }

    fn block_add() -> DeviceSnapshot {
        DeviceSnapshot::builder("add", "/devices/block/sdb")
            .property("ACTION", "add")
            .property("SUBSYSTEM", "block")
            .build()
    }

    #[test]
    fn aggregates_in_declaration_order_with_preamble_between() {
        let rules = RuleSet::new(vec![
            rule(r#"* ACTION=="add""#, "r1\n"),
            rule(r#"* ? SUBSYSTEM=="block""#, "r2\n"),
            rule("*", "r3\n"),
        ]);
        let agg = RuleEvaluator::evaluate(&rules, &block_add());
        assert!(agg.runnable);
        assert_eq!(agg.text, b"r1\nr2\nr3\n");
        assert_eq!(agg.rules.len(), 3);
    }

    #[test]
    fn preamble_only_match_is_not_runnable() {
        let rules = RuleSet::new(vec![
            rule("* ?", "set -e\n"),
            rule(r#"* ACTION=="remove""#, "echo removed\n"),
        ]);
        let agg = RuleEvaluator::evaluate(&rules, &block_add());
        assert!(!agg.runnable);
        assert_eq!(agg.text, b"set -e\n");
    }

    #[test]
    fn no_match_is_empty() {
        let rules = RuleSet::new(vec![rule(r#"* SUBSYSTEM=="net""#, "x\n")]);
        let agg = RuleEvaluator::evaluate(&rules, &block_add());
        assert!(!agg.runnable);
        assert!(agg.text.is_empty());
        assert!(agg.rules.is_empty());
    }

    #[test]
    fn non_matching_rule_between_matches_is_skipped() {
        let rules = RuleSet::new(vec![
            rule("*", "a\n"),
            rule(r#"* ACTION=="remove""#, "b\n"),
            rule("*", "c\n"),
        ]);
        let agg = RuleEvaluator::evaluate(&rules, &block_add());
        assert_eq!(agg.text, b"a\nc\n");
        assert_eq!(agg.headers(), vec!["*".to_string(), "*".to_string()]);
    }

    #[test]
    fn startup_collects_immediate_rules_only() {
        let rules = RuleSet::new(vec![
            rule("* !?", "A\n"),
            rule(r#"* ACTION=="add""#, "skip\n"),
            rule(r#"* ! ACTION=="never""#, "B\n"),
        ]);
        let agg = RuleEvaluator::startup(&rules);
        assert!(agg.runnable);
        assert_eq!(agg.text, b"A\nB\n");
    }

    #[test]
    fn startup_with_only_preamble_is_not_runnable() {
        let rules = RuleSet::new(vec![rule("* !?", "A\n"), rule("*", "x\n")]);
        let agg = RuleEvaluator::startup(&rules);
        assert!(!agg.runnable);
        assert_eq!(agg.text, b"A\n");
    }
}
