//! Local Cache
//!
//! Synchronous same-origin key/value store used as the status-snapshot
//! persistence path. The browser implementation lives in the UI crate;
//! `MemoryCache` backs tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{DomainError, DomainResult, TaskId, TaskStatus};

/// Key written and removed to check that the store accepts writes
pub const PROBE_KEY: &str = "__kanban_probe__";

pub trait LocalCache {
    /// Write then delete a probe entry
    fn probe(&self) -> DomainResult<()> {
        self.set(PROBE_KEY, "1")?;
        self.remove(PROBE_KEY)
    }

    fn get(&self, key: &str) -> DomainResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> DomainResult<()>;

    fn remove(&self, key: &str) -> DomainResult<()>;
}

/// Cached placement of one task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

// Older snapshots stored the bare status string per task.
impl<'de> Deserialize<'de> for SnapshotEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Full { status: TaskStatus, order: Option<u32> },
            Status(TaskStatus),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Full { status, order } => SnapshotEntry { status, order },
            Repr::Status(status) => SnapshotEntry { status, order: None },
        })
    }
}

/// Task id -> placement, stored as one JSON document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusSnapshot(BTreeMap<TaskId, SnapshotEntry>);

impl StatusSnapshot {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&SnapshotEntry> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: TaskId, entry: SnapshotEntry) {
        self.0.insert(id, entry);
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<SnapshotEntry> {
        self.0.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaskId, &SnapshotEntry)> {
        self.0.iter()
    }

    /// Read the snapshot stored under `key`, `None` when absent
    pub fn load(cache: &dyn LocalCache, key: &str) -> DomainResult<Option<Self>> {
        match cache.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, cache: &dyn LocalCache, key: &str) -> DomainResult<()> {
        let raw = serde_json::to_string(self)?;
        cache.set(key, &raw)
    }
}

impl FromIterator<(TaskId, SnapshotEntry)> for StatusSnapshot {
    fn from_iter<I: IntoIterator<Item = (TaskId, SnapshotEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// In-memory cache with an optional byte capacity
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, String>>,
    capacity: Option<usize>,
    disabled: Cell<bool>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse writes that would exceed `bytes` of keys plus values
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            capacity: Some(bytes),
            ..Self::default()
        }
    }

    /// Simulate a store that rejects every access (private mode, policy)
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn check(&self) -> DomainResult<()> {
        if self.disabled.get() {
            return Err(DomainError::StorageUnavailable("storage disabled".to_string()));
        }
        Ok(())
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        self.check()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.check()?;
        let mut entries = self.entries.borrow_mut();
        if let Some(capacity) = self.capacity {
            let used: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if used + key.len() + value.len() > capacity {
                return Err(DomainError::StorageUnavailable("quota exceeded".to_string()));
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        self.check()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_leaves_nothing_behind() {
        let cache = MemoryCache::new();
        cache.probe().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache_fails_probe() {
        let cache = MemoryCache::new();
        cache.set_disabled(true);
        assert!(matches!(cache.probe(), Err(DomainError::StorageUnavailable(_))));
    }

    #[test]
    fn test_capacity_limit() {
        let cache = MemoryCache::with_capacity(10);
        cache.set("k", "12345").unwrap();
        // Overwriting the same key does not count the old value
        cache.set("k", "123456789").unwrap();
        assert!(cache.set("other", "x").is_err());
    }

    #[test]
    fn test_snapshot_save_and_load() {
        let cache = MemoryCache::new();
        assert_eq!(StatusSnapshot::load(&cache, "snap").unwrap(), None);

        let mut snapshot = StatusSnapshot::default();
        snapshot.insert("a".into(), SnapshotEntry { status: TaskStatus::Done, order: Some(2) });
        snapshot.save(&cache, "snap").unwrap();

        let loaded = StatusSnapshot::load(&cache, "snap").unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_reads_bare_status_entries() {
        let cache = MemoryCache::new();
        cache.set("snap", r#"{"a":"inProgress","b":{"status":"done","order":0}}"#).unwrap();
        let loaded = StatusSnapshot::load(&cache, "snap").unwrap().unwrap();
        assert_eq!(
            loaded.get(&"a".into()),
            Some(&SnapshotEntry { status: TaskStatus::InProgress, order: None })
        );
        assert_eq!(loaded.get(&"b".into()).unwrap().order, Some(0));
    }
}
