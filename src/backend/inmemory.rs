//! In-memory query store (default, thread-safe).
//!
//! Uses DashMap for concurrent access with per-key sharding.

use super::{FetchStatus, QueryStore, StoredEntry};
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory query store.
///
/// Clones share the same map.
///
/// ```
/// use fleetdesk::backend::{InMemoryStore, QueryStore};
///
/// let store = InMemoryStore::new();
/// store.upsert("invoices", &mut |entry| entry.generation = 1);
/// assert_eq!(store.get("invoices").map(|e| e.generation), Some(1));
/// assert!(!store.modify("companies", &mut |_| {}));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<DashMap<String, StoredEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Entry counts and payload size.
    pub fn stats(&self) -> StoreStats {
        let mut stats = StoreStats {
            total_entries: self.entries.len(),
            ..StoreStats::default()
        };
        for entry in self.entries.iter() {
            stats.total_bytes += entry.data.as_ref().map_or(0, |d| d.len());
            match entry.status {
                FetchStatus::Loading => stats.loading_entries += 1,
                FetchStatus::Error => stats.failed_entries += 1,
                FetchStatus::Idle | FetchStatus::Success => {}
            }
            if entry.invalidated {
                stats.invalidated_entries += 1;
            }
        }
        stats
    }

    /// Print store statistics to debug log.
    pub fn log_stats(&self) {
        let stats = self.stats();
        debug!(
            "Query store: {} entries ({} loading, {} failed, {} invalidated), {} bytes",
            stats.total_entries,
            stats.loading_entries,
            stats.failed_entries,
            stats.invalidated_entries,
            stats.total_bytes
        );
    }
}

impl QueryStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<StoredEntry> {
        self.entries.get(key).map(|entry| entry.clone())
    }

    fn modify(&self, key: &str, f: &mut dyn FnMut(&mut StoredEntry)) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                f(&mut entry);
                true
            }
            None => false,
        }
    }

    fn upsert(&self, key: &str, f: &mut dyn FnMut(&mut StoredEntry)) {
        let mut entry = self.entries.entry(key.to_string()).or_default();
        f(&mut entry);
    }

    fn delete(&self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        debug!("InMemory DELETE {} ({})", key, removed);
        removed
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear_all(&self) {
        self.entries.clear();
        warn!("InMemory CLEAR_ALL executed - all queries dropped");
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub total_entries: usize,
    pub loading_entries: usize,
    pub failed_entries: usize,
    pub invalidated_entries: usize,
    pub total_bytes: usize,
}
