//! When-clause context: named boolean flags describing the current UI state.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WhenClauseContext {
    values: FxHashMap<CompactString, bool>,
}

impl WhenClauseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<CompactString>, value: bool) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<CompactString>, value: bool) -> Option<bool> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<bool> {
        self.values.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.values.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<CompactString>> FromIterator<(K, bool)> for WhenClauseContext {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        let mut ctx = Self::new();
        ctx.extend(iter);
        ctx
    }
}

impl<K: Into<CompactString>> Extend<(K, bool)> for WhenClauseContext {
    fn extend<I: IntoIterator<Item = (K, bool)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.values.insert(key.into(), value);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/context.rs"]
mod tests;
