//! Change-set computation for flat key/value settings
//!
//! The SiteHost API only accepts incremental changes to a stack environment,
//! never a full replacement, so updates are expressed as the minimal set of
//! upserts and deletions that turn the observed settings into the desired ones.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Wire form of a single setting. An empty `content` asks the remote API to
/// remove the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub name: String,
    pub content: String,
}

/// A single change to a setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Change {
    /// Create the key or overwrite its value
    Upsert { name: String, content: String },
    /// Remove the key
    Delete { name: String },
}

impl Change {
    pub fn name(&self) -> &str {
        match self {
            Change::Upsert { name, .. } | Change::Delete { name } => name,
        }
    }

    /// Lower to the wire encoding, where a deletion is an empty `content`.
    pub fn to_entry(&self) -> ConfigEntry {
        match self {
            Change::Upsert { name, content } => ConfigEntry {
                name: name.clone(),
                content: content.clone(),
            },
            Change::Delete { name } => ConfigEntry {
                name: name.clone(),
                content: String::new(),
            },
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Upsert { name, content } => write!(f, "~ {}={}", name, content),
            Change::Delete { name } => write!(f, "- {}", name),
        }
    }
}

/// Ordered list of changes, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    /// An empty change-set means no mutation call is needed at all.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Change> {
        self.changes.iter()
    }

    pub fn upserts(&self) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Upsert { .. }))
    }

    pub fn deletions(&self) -> impl Iterator<Item = &Change> {
        self.changes
            .iter()
            .filter(|c| matches!(c, Change::Delete { .. }))
    }

    /// Wire entries for the remote update call.
    pub fn to_entries(&self) -> Vec<ConfigEntry> {
        self.changes.iter().map(Change::to_entry).collect()
    }

    /// Settings as they look after the remote side has applied this change-set.
    pub fn apply(&self, observed: &HashMap<String, String>) -> HashMap<String, String> {
        let mut next = observed.clone();
        for change in &self.changes {
            match change {
                Change::Upsert { name, content } => {
                    next.insert(name.clone(), content.clone());
                }
                Change::Delete { name } => {
                    next.remove(name);
                }
            }
        }
        next
    }
}

impl IntoIterator for ChangeSet {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}

/// Compute the minimal change-set from `observed` to `desired`.
///
/// Keys are compared exactly as given; normalizing case is up to the caller.
pub fn diff(observed: &HashMap<String, String>, desired: &HashMap<String, String>) -> ChangeSet {
    let mut by_key: BTreeMap<&str, Change> = BTreeMap::new();

    for (name, content) in desired {
        if observed.get(name) != Some(content) {
            by_key.insert(
                name.as_str(),
                Change::Upsert {
                    name: name.clone(),
                    content: content.clone(),
                },
            );
        }
    }

    for name in observed.keys() {
        if !desired.contains_key(name) {
            by_key.insert(name.as_str(), Change::Delete { name: name.clone() });
        }
    }

    ChangeSet {
        changes: by_key.into_values().collect(),
    }
}
