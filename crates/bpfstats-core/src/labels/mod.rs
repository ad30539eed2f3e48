//! Label sets attached to data points.
//!
//! A `LabelSet` is unordered from the caller's point of view. It is stored
//! sorted by name so iteration, rendering and hashing all see one canonical
//! order no matter how the set was built.

mod key;

use std::collections::BTreeMap;

use crate::error::{Result, StatsError};

pub use key::{hash_labels, LabelKey};

/// Mapping of label name to label value. Values are always strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder form of [`LabelSet::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a label; scalar values are rendered with `ToString`.
    /// Returns the value previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) -> Option<String> {
        self.0.insert(name.into(), value.to_string())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pairs in canonical (name-sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Identity key of this set, see [`hash_labels`].
    pub fn key(&self) -> Result<LabelKey> {
        hash_labels(self)
    }

    /// Check every name against `[a-zA-Z_][a-zA-Z0-9_]*`.
    ///
    /// Names are exported verbatim, so anything outside the grammar is
    /// rejected rather than rewritten: two distinct names must never end up
    /// as the same exported label.
    pub fn validate(&self) -> Result<()> {
        match self.0.keys().find(|name| !is_valid_label_name(name)) {
            Some(bad) => Err(StatsError::InvalidLabel(bad.clone())),
            None => Ok(()),
        }
    }
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl From<BTreeMap<String, String>> for LabelSet {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
