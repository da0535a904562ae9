use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::core::{Result, WhenClauseContext};
use crate::kernel::registry::{CommandRegistry, RuntimeId};

/// Everything a command's enablement depends on: which runtime is attached
/// and the values of the context keys its condition references.
///
/// A runtime id fixes the condition, so values are kept in identifier order
/// without their keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelevantSnapshot {
    runtime: Option<RuntimeId>,
    values: Vec<Option<bool>>,
}

impl RelevantSnapshot {
    pub(crate) fn capture(
        registry: &CommandRegistry,
        name: &str,
        ctx: &WhenClauseContext,
    ) -> Result<Self> {
        let values = match registry.when_clause(name)? {
            Some(clause) => clause
                .identifiers()
                .iter()
                .map(|key| ctx.get(key))
                .collect(),
            None => Vec::new(),
        };
        Ok(Self {
            runtime: registry.runtime_id(name),
            values,
        })
    }
}

struct CacheEntry<T> {
    snapshot: RelevantSnapshot,
    value: T,
}

/// Last descriptor built per command name, reused while the command's
/// relevant snapshot is unchanged.
pub(crate) struct DescriptorCache<T> {
    entries: FxHashMap<CompactString, CacheEntry<T>>,
}

/// Descriptors resolved during one projection call. The cache only changes
/// when the whole call succeeds and the pass is committed.
pub(crate) struct CachePass<T> {
    staged: FxHashMap<CompactString, CacheEntry<T>>,
}

impl<T: Clone> DescriptorCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    pub(crate) fn begin(&self) -> CachePass<T> {
        CachePass {
            staged: FxHashMap::default(),
        }
    }

    /// Returns the descriptor cached for `snapshot`, otherwise builds a new one.
    /// Either way the result is staged in `pass`.
    pub(crate) fn get_or_build(
        &self,
        pass: &mut CachePass<T>,
        name: &str,
        snapshot: RelevantSnapshot,
        build: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let cached = pass
            .staged
            .get(name)
            .or_else(|| self.entries.get(name))
            .filter(|entry| entry.snapshot == snapshot);
        let value = match cached {
            Some(entry) => entry.value.clone(),
            None => {
                let value = build()?;
                tracing::trace!(command = name, "rebuild command descriptor");
                value
            }
        };

        pass.staged.insert(
            CompactString::from(name),
            CacheEntry {
                snapshot,
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Replaces the cache with the pass; commands not projected by it are dropped.
    pub(crate) fn commit(&mut self, pass: CachePass<T>) {
        self.entries = pass.staged;
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/kernel/projection/cache.rs"]
mod tests;
