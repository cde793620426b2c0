//! Observability hooks and staleness policies for queries.
//!
//! Two concerns live here:
//!
//! - **Metrics (`QueryMetrics`)**: hits, misses, deduplicated joins, load
//!   outcomes and invalidations.
//! - **Staleness (`StalePolicy`)**: how long a loaded entry may be served
//!   before the next fetch reloads it.
//!
//! ```
//! use fleetdesk::observability::StalePolicy;
//! use std::time::Duration;
//!
//! // Same window for every collection
//! let _policy = StalePolicy::Fixed(Duration::from_secs(300));
//!
//! // Window chosen per collection by expected write frequency
//! let policy = StalePolicy::PerCollection(|collection| match collection {
//!     "roles" => Duration::from_secs(600),
//!     _ => Duration::from_secs(120),
//! });
//! assert_eq!(policy.stale_time("roles"), Duration::from_secs(600));
//! ```

use crate::key::collections;
use std::time::Duration;

/// Trait for query metrics collection.
pub trait QueryMetrics: Send + Sync {
    /// A fresh cached value answered the fetch.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Query HIT: {} took {:?}", key, duration);
    }

    /// Nothing usable was cached; a load was started.
    fn record_miss(&self, key: &str) {
        debug!("Query MISS: {}", key);
    }

    /// The fetch joined a load already in flight for the same key.
    fn record_join(&self, key: &str) {
        debug!("Query JOIN: {}", key);
    }

    /// A load finished successfully.
    fn record_load(&self, key: &str, duration: Duration) {
        debug!("Query LOAD: {} took {:?}", key, duration);
    }

    /// A load failed.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Query ERROR for {}: {}", key, error);
    }

    /// An entry was invalidated.
    fn record_invalidate(&self, key: &str) {
        debug!("Query INVALIDATE: {}", key);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl QueryMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str) {}
    fn record_join(&self, _key: &str) {}
    fn record_load(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
    fn record_invalidate(&self, _key: &str) {}
}

/// Metrics implementation that only logs through the `log` facade.
#[derive(Clone, Default)]
pub struct LogMetrics;

impl QueryMetrics for LogMetrics {}

/// Staleness window policy.
#[derive(Clone, Debug)]
pub enum StalePolicy {
    /// Same window for every collection.
    Fixed(Duration),

    /// Window chosen per collection name.
    PerCollection(fn(&str) -> Duration),
}

impl StalePolicy {
    /// Staleness window for a collection.
    pub fn stale_time(&self, collection: &str) -> Duration {
        match self {
            StalePolicy::Fixed(d) => *d,
            StalePolicy::PerCollection(f) => f(collection),
        }
    }
}

impl Default for StalePolicy {
    fn default() -> Self {
        StalePolicy::PerCollection(default_stale_time)
    }
}

/// Dashboard windows, chosen by how often each collection is written.
pub fn default_stale_time(collection: &str) -> Duration {
    const MINUTE: u64 = 60;
    match collection {
        collections::DASHBOARD_OVERVIEW
        | collections::CREWS
        | collections::CONTACT_US
        | collections::SESSIONS => Duration::from_secs(2 * MINUTE),
        collections::VESSELS => Duration::from_secs(3 * MINUTE),
        collections::ROLES | collections::VESSEL_TYPES => Duration::from_secs(10 * MINUTE),
        _ => Duration::from_secs(5 * MINUTE),
    }
}
