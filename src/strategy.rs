//! Fetch strategies and per-operation options.
//!
//! Every cache fetch uses one of four strategies:
//!
//! ```
//! use fleetdesk::strategy::FetchStrategy;
//!
//! // 1. Refresh - serve while fresh, reload once stale (default)
//! let _s = FetchStrategy::Refresh;
//!
//! // 2. Fresh - cached value only, never touch the network
//! let _s = FetchStrategy::Fresh;
//!
//! // 3. Invalidate - mark stale, then reload
//! let _s = FetchStrategy::Invalidate;
//!
//! // 4. Bypass - always reload, still store the result
//! let _s = FetchStrategy::Bypass;
//! ```
//!
//! | Strategy | Fresh entry | Stale / missing entry | Use Case |
//! |----------|-------------|-----------------------|----------|
//! | **Refresh** | Return | Load | Normal query rendering |
//! | **Fresh** | Return | `Error::CacheMiss` | Peek without a request |
//! | **Invalidate** | Load | Load | Manual retry button |
//! | **Bypass** | Load | Load | Diagnostics |

use std::time::Duration;

/// Strategy enum controlling cache fetch behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FetchStrategy {
    /// Return the cached value while it is within its staleness window,
    /// otherwise load and overwrite the entry.
    #[default]
    Refresh,

    /// Return whatever is cached, regardless of age. A missing entry is
    /// `Error::CacheMiss`; no loader runs.
    Fresh,

    /// Mark the entry stale, then load as `Refresh` would.
    Invalidate,

    /// Ignore the cached value and load; the result is still stored.
    Bypass,
}

impl FetchStrategy {
    /// Whether a fresh cached value may answer the fetch.
    pub fn reads_cache(self) -> bool {
        matches!(self, FetchStrategy::Refresh | FetchStrategy::Fresh)
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::Refresh => write!(f, "Refresh"),
            FetchStrategy::Fresh => write!(f, "Fresh"),
            FetchStrategy::Invalidate => write!(f, "Invalidate"),
            FetchStrategy::Bypass => write!(f, "Bypass"),
        }
    }
}

/// Retry behavior for a query's loader.
///
/// Queries do not retry unless they opt in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retry {
    /// Additional attempts after the first failure.
    pub attempts: u32,
    /// Delay before the first retry; doubles on every further retry.
    pub base_delay: Duration,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
}

impl Retry {
    pub const fn none() -> Self {
        Retry {
            attempts: 0,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    /// `attempts` retries with delay `min(1s * 2^n, 30s)`.
    pub const fn exponential(attempts: u32) -> Self {
        Retry {
            attempts,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

impl Default for Retry {
    fn default() -> Self {
        Retry::none()
    }
}

/// Per-operation overrides.
///
/// ```
/// use fleetdesk::strategy::{QueryOptions, Retry};
/// use std::time::Duration;
///
/// let options = QueryOptions::default()
///     .with_stale_time(Duration::from_secs(120))
///     .with_retry(Retry::exponential(3));
/// assert_eq!(options.retry.attempts, 3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Override the collection's staleness window for this fetch only.
    pub stale_time: Option<Duration>,
    pub retry: Retry,
}

impl QueryOptions {
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = Some(stale_time);
        self
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(FetchStrategy::Fresh.to_string(), "Fresh");
        assert_eq!(FetchStrategy::Refresh.to_string(), "Refresh");
        assert_eq!(FetchStrategy::Invalidate.to_string(), "Invalidate");
        assert_eq!(FetchStrategy::Bypass.to_string(), "Bypass");
    }

    #[test]
    fn test_strategy_default() {
        assert_eq!(FetchStrategy::default(), FetchStrategy::Refresh);
    }

    #[test]
    fn test_strategy_reads_cache() {
        assert!(FetchStrategy::Refresh.reads_cache());
        assert!(FetchStrategy::Fresh.reads_cache());
        assert!(!FetchStrategy::Invalidate.reads_cache());
        assert!(!FetchStrategy::Bypass.reads_cache());
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let retry = Retry::exponential(10);
        assert_eq!(retry.delay(0), Duration::from_secs(1));
        assert_eq!(retry.delay(1), Duration::from_secs(2));
        assert_eq!(retry.delay(4), Duration::from_secs(16));
        assert_eq!(retry.delay(5), Duration::from_secs(30));
        assert_eq!(retry.delay(40), Duration::from_secs(30));
    }

    #[test]
    fn test_options_builder() {
        let options = QueryOptions::default().with_stale_time(Duration::from_secs(60));
        assert_eq!(options.stale_time, Some(Duration::from_secs(60)));
        assert_eq!(options.retry, Retry::none());
    }
}
