//! Configuration group registries.
//!
//! `racadm get <group>` returns a group header line followed by `Key=Value`
//! pairs; read-only keys are prefixed with `#`. A [`Registry`] keeps the
//! loaded map plus a staged-changes map: staging an unknown key is an error,
//! staging the current value is a no-op, and reads prefer the staged value.

use crate::session::{RacError, Session};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

#[derive(Debug)]
pub struct Registry {
    pub group: String,
    current: BTreeMap<String, String>,
    readonly: BTreeSet<String>,
    pub changes: BTreeMap<String, String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StageOutcome {
    Staged,
    Unchanged,
}

impl Registry {
    pub fn load(session: &Session, group: &str) -> anyhow::Result<Self> {
        info!("loading registry: {}", group);
        let output = session.exec(&format!("get {group}"))?;
        Self::parse(group, &output)
    }

    pub fn parse(group: &str, output: &str) -> anyhow::Result<Self> {
        let mut current = BTreeMap::new();
        let mut readonly = BTreeSet::new();
        // first line is the group header, e.g. [Key=iDRAC.Embedded.1#IPv4.1]
        for line in output.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| RacError::Parse(format!("registry line: {line}")))?;
            let key = match key.strip_prefix('#') {
                Some(stripped) => {
                    readonly.insert(stripped.to_string());
                    stripped
                }
                None => key,
            };
            current.insert(key.to_string(), value.to_string());
        }
        Ok(Self {
            group: group.to_string(),
            current,
            readonly,
            changes: BTreeMap::new(),
        })
    }

    /// Current value with staged changes taking precedence.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.changes
            .get(key)
            .or_else(|| self.current.get(key))
            .map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.current.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_readonly(&self, key: &str) -> bool {
        self.readonly.contains(key)
    }

    pub fn stage(&mut self, key: &str, value: &str) -> anyhow::Result<StageOutcome> {
        let Some(current) = self.current.get(key) else {
            return Err(RacError::UnknownKey {
                group: self.group.clone(),
                key: key.to_string(),
            }
            .into());
        };
        if self.readonly.contains(key) {
            return Err(RacError::ReadOnlyKey {
                group: self.group.clone(),
                key: key.to_string(),
            }
            .into());
        }
        if current == value {
            self.changes.remove(key);
            return Ok(StageOutcome::Unchanged);
        }
        self.changes.insert(key.to_string(), value.to_string());
        Ok(StageOutcome::Staged)
    }

    /// Write staged changes to the iDRAC, then reload the group.
    ///
    /// Returns whether anything was written.
    pub fn write(&mut self, session: &Session) -> anyhow::Result<bool> {
        if self.changes.is_empty() {
            return Ok(false);
        }
        info!("writing changes on {}: {:?}", self.group, self.changes);
        for (key, value) in &self.changes {
            session.exec(&format!("set {}.{} {}", self.group, key, value))?;
        }
        self.changes.clear();
        let reloaded = Self::load(session, &self.group)?;
        self.current = reloaded.current;
        self.readonly = reloaded.readonly;
        Ok(true)
    }
}
