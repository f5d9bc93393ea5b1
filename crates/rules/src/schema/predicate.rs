//! Clause and predicate types and their evaluation.

use std::fmt;

use uudev_core::{DeviceSnapshot, DEVLINK};

/// Comparison operator of a single clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::NotEquals => "!=",
        }
    }

    fn apply(&self, equal: bool) -> bool {
        match self {
            Operator::Equals => equal,
            Operator::NotEquals => !equal,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `KEY OP "value"` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub key: String,
    pub op: Operator,
    pub value: String,
}

impl Clause {
    pub fn new(key: impl Into<String>, op: Operator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    /// Evaluate against a snapshot.
    ///
    /// `DEVLINK` tests alias membership, with `""` meaning "no aliases".
    /// Any other key reads the property map, an absent key reading as `""`.
    pub fn matches(&self, dev: &DeviceSnapshot) -> bool {
        let equal = if self.key == DEVLINK {
            if self.value.is_empty() {
                dev.aliases().is_empty()
            } else {
                dev.has_alias(&self.value)
            }
        } else {
            dev.property_or_empty(&self.key) == self.value
        };
        self.op.apply(equal)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{:?}", self.key, self.op, self.value)
    }
}

/// Conjunction of clauses, evaluated left to right. Empty means always true.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_always(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, dev: &DeviceSnapshot) -> bool {
        for clause in &self.clauses {
            if !clause.matches(dev) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(props: &[(&str, &str)], aliases: &[&str]) -> DeviceSnapshot {
        let mut b = DeviceSnapshot::builder("add", "/devices/test");
        for (k, v) in props {
            b = b.property(*k, *v);
        }
        b.aliases(aliases.iter().copied()).build()
    }

    #[test]
    fn empty_predicate_matches_bare_snapshot() {
        assert!(Predicate::always().matches(&dev(&[], &[])));
        assert!(Predicate::always().matches(&dev(&[("A", "1")], &["/dev/x"])));
    }

    #[test]
    fn equals_and_not_equals_on_present_key() {
        let d = dev(&[("KEY", "X")], &[]);
        assert!(Clause::new("KEY", Operator::Equals, "X").matches(&d));
        assert!(!Clause::new("KEY", Operator::Equals, "Y").matches(&d));
        assert!(!Clause::new("KEY", Operator::NotEquals, "X").matches(&d));
        assert!(Clause::new("KEY", Operator::NotEquals, "Y").matches(&d));
    }

    #[test]
    fn absent_key_compares_as_empty_string() {
        let d = dev(&[], &[]);
        assert!(!Clause::new("KEY", Operator::Equals, "X").matches(&d));
        assert!(Clause::new("KEY", Operator::NotEquals, "X").matches(&d));
        assert!(Clause::new("KEY", Operator::Equals, "").matches(&d));
        assert!(!Clause::new("KEY", Operator::NotEquals, "").matches(&d));
    }

    #[test]
    fn conjunction_truth_table() {
        let pred = Predicate::new(vec![
            Clause::new("A", Operator::Equals, "1"),
            Clause::new("B", Operator::NotEquals, "2"),
        ]);
        assert!(pred.matches(&dev(&[("A", "1"), ("B", "3")], &[])));
        assert!(!pred.matches(&dev(&[("A", "1"), ("B", "2")], &[])));
        assert!(!pred.matches(&dev(&[("A", "0"), ("B", "3")], &[])));
        assert!(!pred.matches(&dev(&[("A", "0"), ("B", "2")], &[])));
    }

    #[test]
    fn devlink_tests_alias_membership() {
        let d = dev(&[("DEVLINK", "/dev/ignored")], &["/dev/disk/by-label/usb", "/dev/sdb"]);
        assert!(Clause::new(DEVLINK, Operator::Equals, "/dev/sdb").matches(&d));
        assert!(!Clause::new(DEVLINK, Operator::Equals, "/dev/ignored").matches(&d));
        assert!(Clause::new(DEVLINK, Operator::NotEquals, "/dev/sdc").matches(&d));
        assert!(!Clause::new(DEVLINK, Operator::Equals, "").matches(&d));
    }

    #[test]
    fn empty_devlink_matches_empty_alias_set() {
        let d = dev(&[], &[]);
        assert!(Clause::new(DEVLINK, Operator::Equals, "").matches(&d));
        assert!(!Clause::new(DEVLINK, Operator::NotEquals, "").matches(&d));
        assert!(!Clause::new(DEVLINK, Operator::Equals, "/dev/sdb").matches(&d));
    }
}
