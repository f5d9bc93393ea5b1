use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Property key whose clauses test the alias set instead of the property map.
pub const DEVLINK: &str = "DEVLINK";

/// Immutable view of one device notification.
///
/// Properties and aliases live in ordered collections so that dumps and
/// environment injection come out in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceSnapshot {
    action: String,
    devpath: String,
    aliases: BTreeSet<String>,
    properties: BTreeMap<String, String>,
}

impl DeviceSnapshot {
    pub fn builder(action: impl Into<String>, devpath: impl Into<String>) -> DeviceSnapshotBuilder {
        DeviceSnapshotBuilder {
            inner: DeviceSnapshot {
                action: action.into(),
                devpath: devpath.into(),
                ..Default::default()
            },
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn devpath(&self) -> &str {
        &self.devpath
    }

    pub fn aliases(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Property value, or `""` when the key is absent.
    pub fn property_or_empty(&self, key: &str) -> &str {
        self.properties.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.contains(alias)
    }

    /// Environment overrides for an action run against this snapshot.
    ///
    /// One entry per property, then one `DEVLINK` entry per alias. Later
    /// entries under the same name win when applied in order.
    pub fn env_overrides(&self) -> Vec<(&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(self.aliases.iter().map(|a| (DEVLINK, a.as_str())))
            .collect()
    }

    /// Write the `KEY=value` dump used by verbose diagnostics.
    pub fn dump(&self, out: &mut impl std::io::Write) -> std::io::Result<()> {
        for (k, v) in &self.properties {
            writeln!(out, "{k}={v}")?;
        }
        for alias in &self.aliases {
            writeln!(out, "{DEVLINK}={alias}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeviceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.devpath)
    }
}

/// Builder for [`DeviceSnapshot`]; the snapshot is frozen once built.
#[derive(Debug, Clone)]
pub struct DeviceSnapshotBuilder {
    inner: DeviceSnapshot,
}

impl DeviceSnapshotBuilder {
    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.properties.insert(key.into(), value.into());
        self
    }

    /// Insert a property only if the key is not already set.
    pub fn property_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .properties
            .entry(key.into())
            .or_insert_with(|| value.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.inner.aliases.insert(alias.into());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> DeviceSnapshot {
        self.inner
    }
}
