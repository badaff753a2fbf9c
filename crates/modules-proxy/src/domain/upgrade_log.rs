//! Append-only upgrade history with an active pointer per key.
//!
//! Keyed by `Selector` in the modules proxy and by `ModuleName` in the
//! beacon. Entries are never rewritten; activating an older implementation
//! appends a new entry that points at it.

use super::value_objects::{LogIndex, ModuleRef, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// One row of upgrade history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLogEntry<K> {
    /// Selector or module name this row belongs to.
    pub key: K,
    /// 1-based position within the key's history.
    pub index: LogIndex,
    /// `None` marks a removal.
    pub implementation: Option<ModuleRef>,
    /// When the row was appended.
    pub timestamp: Timestamp,
}

/// Per-key history. Cloning is cheap: each key's rows sit behind an `Arc`
/// and are copied only when appended to.
#[derive(Clone, Debug)]
pub struct UpgradeLog<K> {
    entries: HashMap<K, Arc<Vec<UpgradeLogEntry<K>>>>,
    active: HashMap<K, LogIndex>,
}

impl<K> Default for UpgradeLog<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            active: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> UpgradeLog<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row for `key` and point the active index at it.
    ///
    /// Returns the new active index.
    pub fn append(
        &mut self,
        key: K,
        implementation: Option<ModuleRef>,
        timestamp: Timestamp,
    ) -> LogIndex {
        let rows = Arc::make_mut(self.entries.entry(key).or_default());
        let index = rows.len() as LogIndex + 1;
        rows.push(UpgradeLogEntry {
            key,
            index,
            implementation,
            timestamp,
        });
        self.active.insert(key, index);
        index
    }

    /// Current active index, `0` if `key` was never registered.
    pub fn active_index(&self, key: &K) -> LogIndex {
        self.active.get(key).copied().unwrap_or(0)
    }

    /// Row at 1-based `index`.
    pub fn entry(&self, key: &K, index: LogIndex) -> Option<&UpgradeLogEntry<K>> {
        let position = usize::try_from(index).ok()?.checked_sub(1)?;
        self.entries.get(key)?.get(position)
    }

    /// Row the active index points at.
    pub fn active_entry(&self, key: &K) -> Option<&UpgradeLogEntry<K>> {
        self.entry(key, self.active_index(key))
    }

    /// Implementation currently active for `key`, if any.
    pub fn active_implementation(&self, key: &K) -> Option<ModuleRef> {
        self.active_entry(key).and_then(|e| e.implementation)
    }

    /// Full history for `key`, oldest first.
    pub fn history(&self, key: &K) -> &[UpgradeLogEntry<K>] {
        self.entries.get(key).map(|rows| rows.as_slice()).unwrap_or(&[])
    }

    /// Number of rows recorded for `key`.
    pub fn len_for(&self, key: &K) -> usize {
        self.history(key).len()
    }

    /// Keys with at least one row.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Rows across all keys.
    pub fn total_entries(&self) -> usize {
        self.entries.values().map(|rows| rows.len()).sum()
    }
}
