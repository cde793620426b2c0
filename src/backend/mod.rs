//! Query store implementations.

use crate::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub mod inmemory;

pub use inmemory::{InMemoryStore, StoreStats};

/// Lifecycle of a cached query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FetchStatus {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// The last load succeeded.
    Success,
    /// The last load failed; previous data, if any, is kept.
    Error,
}

/// One cached query.
#[derive(Clone, Debug, Default)]
pub struct StoredEntry {
    /// Envelope bytes of the last successful load (or explicit write).
    pub data: Option<Arc<Vec<u8>>>,
    pub status: FetchStatus,
    /// When `data` was written.
    pub fetched_at: Option<Instant>,
    /// Error of the last failed load.
    pub error: Option<Error>,
    /// Set by invalidation; cleared by the next successful write.
    pub invalidated: bool,
    /// Changed by invalidation and explicit writes. A load only writes back
    /// when the generation it started with is still current.
    pub generation: u64,
}

impl StoredEntry {
    /// Whether the next fetch must reload.
    pub fn is_stale(&self, now: Instant, window: Duration) -> bool {
        if self.invalidated || self.data.is_none() {
            return true;
        }
        match self.fetched_at {
            Some(at) => now.saturating_duration_since(at) > window,
            None => true,
        }
    }
}

/// Storage for query entries.
///
/// Methods are synchronous and take `&self`; implementations use interior
/// mutability. Closures passed to `modify` run while the entry is locked, so
/// they must not call back into the store.
pub trait QueryStore: Send + Sync + Clone + 'static {
    /// Snapshot of an entry.
    fn get(&self, key: &str) -> Option<StoredEntry>;

    /// Apply `f` to an existing entry. Returns `false` if the key is absent.
    fn modify(&self, key: &str, f: &mut dyn FnMut(&mut StoredEntry)) -> bool;

    /// Apply `f` to the entry, creating a default entry first if absent.
    fn upsert(&self, key: &str, f: &mut dyn FnMut(&mut StoredEntry));

    /// Remove an entry. Returns `true` if it existed.
    fn delete(&self, key: &str) -> bool;

    /// All keys currently stored.
    fn keys(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear_all(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_data_is_stale() {
        let entry = StoredEntry::default();
        assert!(entry.is_stale(Instant::now(), Duration::from_secs(300)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_staleness_window() {
        let entry = StoredEntry {
            data: Some(Arc::new(vec![1, 2, 3])),
            fetched_at: Some(Instant::now()),
            status: FetchStatus::Success,
            ..StoredEntry::default()
        };
        let window = Duration::from_secs(120);

        assert!(!entry.is_stale(Instant::now(), window));
        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(!entry.is_stale(Instant::now(), window));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_stale(Instant::now(), window));
    }

    #[test]
    fn test_invalidated_entry_is_stale() {
        let entry = StoredEntry {
            data: Some(Arc::new(vec![1])),
            fetched_at: Some(Instant::now()),
            invalidated: true,
            ..StoredEntry::default()
        };
        assert!(entry.is_stale(Instant::now(), Duration::from_secs(300)));
    }
}
