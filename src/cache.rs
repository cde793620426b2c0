//! Query cache - main entry point for cached reads.
//!
//! A [`QueryCache`] maps [`QueryKey`]s to loaded values. Callers hand it a
//! loader closure; the cache decides whether to answer from storage or run
//! the loader, and makes sure at most one load per key is in flight.

use crate::backend::{FetchStatus, InMemoryStore, QueryStore, StoredEntry};
use crate::error::{Error, Result};
use crate::key::QueryKey;
use crate::observability::{NoOpMetrics, QueryMetrics, StalePolicy};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use crate::strategy::{FetchStrategy, QueryOptions, Retry};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{join_all, BoxFuture, Shared};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<Vec<u8>>>>>;

struct InFlight {
    generation: u64,
    load: SharedLoad,
}

/// Snapshot of one query, decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub status: FetchStatus,
    pub error: Option<Error>,
    pub fetched_at: Option<Instant>,
    /// Whether the next `Refresh` fetch would reload.
    pub is_stale: bool,
}

impl<T> QueryState<T> {
    fn idle() -> Self {
        QueryState {
            data: None,
            status: FetchStatus::Idle,
            error: None,
            fetched_at: None,
            is_stale: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}

/// Result of a dependent query that issued one request per parent.
#[derive(Clone, Debug, PartialEq)]
pub struct FanOut<T> {
    /// Items of every successful sub-request, in parent order.
    pub items: Vec<T>,
    /// Parents whose sub-request failed.
    pub failed: Vec<(String, Error)>,
}

impl<T> FanOut<T> {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

impl<T> Default for FanOut<T> {
    fn default() -> Self {
        FanOut {
            items: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Keyed cache of query results with staleness windows, in-flight
/// deduplication and prefix invalidation.
///
/// Cloning is cheap; clones share storage and the in-flight table.
///
/// ```
/// use fleetdesk::{create_cache, QueryKey};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> fleetdesk::Result<()> {
/// let cache = create_cache();
/// let key = QueryKey::new("roles");
///
/// let roles: Vec<String> = cache
///     .fetch(&key, || async { Ok(vec!["CAPTAIN".to_string()]) })
///     .await?;
/// assert_eq!(roles, vec!["CAPTAIN"]);
///
/// // Served from storage until the window passes or the key is invalidated.
/// let again: Vec<String> = cache
///     .fetch(&key, || async { Ok(Vec::<String>::new()) })
///     .await?;
/// assert_eq!(again, roles);
/// # Ok(())
/// # }
/// ```
pub struct QueryCache<S: QueryStore = InMemoryStore> {
    store: S,
    in_flight: Arc<DashMap<String, InFlight>>,
    generations: Arc<AtomicU64>,
    stale_policy: StalePolicy,
    metrics: Arc<dyn QueryMetrics>,
}

impl<S: QueryStore> Clone for QueryCache<S> {
    fn clone(&self) -> Self {
        QueryCache {
            store: self.store.clone(),
            in_flight: Arc::clone(&self.in_flight),
            generations: Arc::clone(&self.generations),
            stale_policy: self.stale_policy.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<S: QueryStore> fmt::Debug for QueryCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.store.len())
            .field("in_flight", &self.in_flight.len())
            .field("stale_policy", &self.stale_policy)
            .finish()
    }
}

/// A new cache on the in-memory store with the dashboard staleness windows.
pub fn create_cache() -> QueryCache {
    QueryCache::new(InMemoryStore::new())
}

impl<S: QueryStore> QueryCache<S> {
    pub fn new(store: S) -> Self {
        QueryCache {
            store,
            in_flight: Arc::new(DashMap::new()),
            generations: Arc::new(AtomicU64::new(1)),
            stale_policy: StalePolicy::default(),
            metrics: Arc::new(NoOpMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn QueryMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.stale_policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of loads currently in flight.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Fetch with default options and the `Refresh` strategy.
    ///
    /// # Errors
    ///
    /// Whatever the loader returns, plus `Error::SerializationError` if the
    /// value cannot be encoded.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.fetch_with(key, QueryOptions::default(), FetchStrategy::Refresh, loader)
            .await
    }

    /// Fetch with per-call options and strategy.
    ///
    /// The loader runs in a spawned task. Dropping the returned future does
    /// not cancel it; the result still lands in the cache.
    pub async fn fetch_with<T, F, Fut>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        strategy: FetchStrategy,
        loader: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let key_str = key.to_string();
        let timer = Instant::now();
        let window = options
            .stale_time
            .unwrap_or_else(|| self.stale_policy.stale_time(key.collection()));

        match strategy {
            FetchStrategy::Fresh => {
                debug!("Executing Fresh strategy for {}", key_str);
                return match self.cached_value::<T>(&key_str)? {
                    Some(value) => {
                        self.metrics.record_hit(&key_str, timer.elapsed());
                        Ok(value)
                    }
                    None => {
                        debug!("Cache miss (Fresh strategy) - no loader for {}", key_str);
                        Err(Error::CacheMiss)
                    }
                };
            }
            FetchStrategy::Refresh => {
                if let Some(entry) = self.store.get(&key_str) {
                    if !entry.is_stale(Instant::now(), window) {
                        if let Some(value) = self.decode_entry::<T>(&key_str, &entry) {
                            self.metrics.record_hit(&key_str, timer.elapsed());
                            return Ok(value);
                        }
                    }
                }
            }
            FetchStrategy::Invalidate => {
                debug!("Executing Invalidate strategy for {}", key_str);
                self.mark_stale(&key_str);
                self.in_flight.remove(&key_str);
            }
            FetchStrategy::Bypass => {
                debug!("Bypassing cached value for {}", key_str);
            }
        }

        let bytes = self.load_shared(key_str, options.retry, loader).await?;
        deserialize_from_cache(&bytes)
    }

    /// Join the in-flight load for `key`, or start one.
    async fn load_shared<T, F, Fut>(
        &self,
        key: String,
        retry: Retry,
        loader: F,
    ) -> Result<Arc<Vec<u8>>>
    where
        T: Serialize + Send + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let load = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(occupied) => {
                self.metrics.record_join(&key);
                occupied.get().load.clone()
            }
            Entry::Vacant(vacant) => {
                self.metrics.record_miss(&key);
                let generation = self.begin_load(&key);
                let task = tokio::spawn(run_load(
                    self.clone(),
                    key.clone(),
                    generation,
                    retry,
                    loader,
                ));
                let load = async move {
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => Err(Error::Other(format!("Load task failed: {}", e))),
                    }
                }
                .boxed()
                .shared();
                vacant.insert(InFlight {
                    generation,
                    load: load.clone(),
                });
                load
            }
        };
        load.await
    }

    /// Mark the entry loading and return the generation the load belongs to.
    fn begin_load(&self, key: &str) -> u64 {
        let fresh = self.next_generation();
        let mut generation = 0;
        self.store.upsert(key, &mut |entry| {
            if entry.generation == 0 {
                entry.generation = fresh;
            }
            entry.status = FetchStatus::Loading;
            generation = entry.generation;
        });
        generation
    }

    /// Write a finished load back, unless its generation went stale.
    fn finish_load(&self, key: &str, generation: u64, outcome: &Result<Arc<Vec<u8>>>) -> bool {
        let mut written = false;
        self.store.modify(key, &mut |entry| {
            if entry.generation != generation {
                return;
            }
            written = true;
            match outcome {
                Ok(bytes) => {
                    entry.data = Some(Arc::clone(bytes));
                    entry.fetched_at = Some(Instant::now());
                    entry.status = FetchStatus::Success;
                    entry.error = None;
                    entry.invalidated = false;
                }
                Err(e) => {
                    entry.status = FetchStatus::Error;
                    entry.error = Some(e.clone());
                }
            }
        });
        self.in_flight
            .remove_if(key, |_, in_flight| in_flight.generation == generation);
        written
    }

    fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed)
    }

    fn mark_stale(&self, key: &str) -> bool {
        let fresh = self.next_generation();
        let marked = self.store.modify(key, &mut |entry| {
            entry.invalidated = true;
            entry.generation = fresh;
            if entry.status == FetchStatus::Loading {
                entry.status = if entry.data.is_some() {
                    FetchStatus::Success
                } else {
                    FetchStatus::Idle
                };
            }
        });
        if marked {
            self.metrics.record_invalidate(key);
        }
        marked
    }

    /// Decode an entry's data. Corrupt or outdated entries are evicted; any
    /// decode failure is treated as missing.
    fn decode_entry<T: DeserializeOwned>(&self, key: &str, entry: &StoredEntry) -> Option<T> {
        let bytes = entry.data.as_ref()?;
        match deserialize_from_cache(bytes) {
            Ok(value) => Some(value),
            Err(e) if e.is_cache_corruption() => {
                error!("Evicting unreadable entry {}: {}", key, e);
                self.store.delete(key);
                None
            }
            Err(e) => {
                warn!("Could not decode entry {}: {}", key, e);
                None
            }
        }
    }

    fn cached_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self
            .store
            .get(key)
            .and_then(|entry| self.decode_entry(key, &entry)))
    }

    /// Mark every entry under `prefix` stale and detach their in-flight loads.
    ///
    /// Returns the number of entries marked. Loads already running keep
    /// running, but their results are not written back.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut marked = 0;
        for key in self.store.keys() {
            if QueryKey::parse(&key).starts_with(prefix) && self.mark_stale(&key) {
                marked += 1;
            }
        }
        self.in_flight
            .retain(|key, _| !QueryKey::parse(key).starts_with(prefix));
        info!("Invalidated {} queries under {}", marked, prefix);
        marked
    }

    /// Cached value regardless of staleness.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        self.cached_value(&key.to_string())
    }

    /// Write a value directly, as if it had just been loaded.
    ///
    /// Loads in flight for the key are detached.
    pub fn set<T: Serialize>(&self, key: &QueryKey, value: &T) -> Result<()> {
        let key_str = key.to_string();
        let bytes = Arc::new(serialize_for_cache(value)?);
        let fresh = self.next_generation();
        self.store.upsert(&key_str, &mut |entry| {
            entry.data = Some(Arc::clone(&bytes));
            entry.fetched_at = Some(Instant::now());
            entry.status = FetchStatus::Success;
            entry.error = None;
            entry.invalidated = false;
            entry.generation = fresh;
        });
        self.in_flight.remove(&key_str);
        debug!("Query SET {}", key_str);
        Ok(())
    }

    /// Decoded snapshot of a query.
    pub fn state<T: DeserializeOwned>(&self, key: &QueryKey) -> QueryState<T> {
        let key_str = key.to_string();
        let Some(entry) = self.store.get(&key_str) else {
            return QueryState::idle();
        };
        let window = self.stale_policy.stale_time(key.collection());
        QueryState {
            data: self.decode_entry(&key_str, &entry),
            status: entry.status,
            error: entry.error.clone(),
            fetched_at: entry.fetched_at,
            is_stale: entry.is_stale(Instant::now(), window),
        }
    }

    /// Drop one entry and detach its load.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let key_str = key.to_string();
        self.in_flight.remove(&key_str);
        self.store.delete(&key_str)
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.in_flight.clear();
        self.store.clear_all();
    }
}

async fn run_load<S, T, F, Fut>(
    cache: QueryCache<S>,
    key: String,
    generation: u64,
    retry: Retry,
    mut loader: F,
) -> Result<Arc<Vec<u8>>>
where
    S: QueryStore,
    T: Serialize + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let timer = Instant::now();
    let mut attempt = 0;
    let outcome = loop {
        match loader().await {
            Ok(value) => break serialize_for_cache(&value).map(Arc::new),
            Err(e) if attempt < retry.attempts && e.is_retryable() => {
                let delay = retry.delay(attempt);
                warn!(
                    "Load of {} failed (attempt {}): {}; retrying in {:?}",
                    key,
                    attempt + 1,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => break Err(e),
        }
    };

    match &outcome {
        Ok(_) => cache.metrics.record_load(&key, timer.elapsed()),
        Err(e) => cache.metrics.record_error(&key, &e.to_string()),
    }
    if !cache.finish_load(&key, generation, &outcome) {
        warn!("Discarding result for {}: invalidated while loading", key);
    }
    outcome
}

/// Run one sub-request per parent concurrently.
///
/// Items come back in parent order. A failed parent is logged and listed in
/// [`FanOut::failed`]; the other parents' items are still returned.
pub async fn fan_out<T, F, Fut>(parents: Vec<String>, label: &str, per_parent: F) -> FanOut<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let requests = parents.iter().cloned().map(&per_parent);
    let results = join_all(requests).await;

    let mut out = FanOut::default();
    for (parent, result) in parents.into_iter().zip(results) {
        match result {
            Ok(items) => out.items.extend(items),
            Err(e) => {
                warn!("Failed to fetch {} for {}: {}", label, parent, e);
                out.failed.push((parent, e));
            }
        }
    }
    out
}
