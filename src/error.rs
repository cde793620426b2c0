//! Error types for the dashboard data layer.

use std::fmt;

/// Result type for fleetdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for fleetdesk.
///
/// Errors are `Clone` because a single in-flight load is shared by every
/// caller waiting on the same query key, and each of them receives the
/// same outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The backend answered with a non-2xx status, or the request never
    /// completed (`status` is `None` for connection and transport failures).
    ///
    /// The query keeps its previous data; the view shows a retry affordance.
    NetworkError {
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Human readable description.
        message: String,
    },

    /// The backend answered 2xx but the body was not the expected JSON
    /// envelope. Propagated exactly like `NetworkError`.
    DecodeError(String),

    /// A form input failed a local precondition.
    ///
    /// Raised before any network call is made and never stored in the cache.
    /// The message is meant to be shown inline next to the form.
    ValidationError(String),

    /// Cache miss under `FetchStrategy::Fresh`.
    CacheMiss,

    /// Encoding a value into a cache envelope failed.
    SerializationError(String),

    /// Decoding a cache envelope payload failed.
    ///
    /// **Recovery:** the entry is evicted and reloaded.
    DeserializationError(String),

    /// Cache entry header is invalid (bad magic or corrupted envelope).
    ///
    /// **Recovery:** the entry is evicted and reloaded.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Configuration could not be loaded or is invalid.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl Error {
    /// Build a `NetworkError` for a received non-2xx status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Error::NetworkError {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether a retry policy may re-run the operation that produced this error.
    ///
    /// Local validation failures and cache misses are deterministic.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Error::ValidationError(_) | Error::CacheMiss)
    }

    /// Whether the error describes a corrupt or outdated cache entry.
    pub fn is_cache_corruption(&self) -> bool {
        matches!(
            self,
            Error::DeserializationError(_)
                | Error::InvalidCacheEntry(_)
                | Error::VersionMismatch { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NetworkError {
                status: Some(code),
                message,
            } => write!(f, "Network error ({}): {}", code, message),
            Error::NetworkError {
                status: None,
                message,
            } => write!(f, "Network error: {}", message),
            Error::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Error::CacheMiss => write!(f, "Cache miss"),
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => {
                write!(f, "Invalid cache entry: {}", msg)
            }
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::DecodeError(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return Error::DecodeError(e.to_string());
        }
        Error::NetworkError {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

impl From<envy::Error> for Error {
    fn from(e: envy::Error) -> Self {
        Error::ConfigError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
