//! Postcard-based cache serialization with versioned envelopes.
//!
//! Every cached view-model is stored as:
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (varint) │POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "FDSK"              u32                postcard::to_allocvec(T)
//! ```
//!
//! Reads decode a fresh value every time, so a caller can never mutate the
//! copy held by the cache.
//!
//! Cached types must use plain serde shapes: postcard is not
//! self-describing, so `#[serde(untagged)]`, `#[serde(flatten)]` and
//! `serde_json::Value` fields cannot be decoded from an envelope.
//!
//! ```rust
//! use fleetdesk::serialization::{deserialize_from_cache, serialize_for_cache};
//!
//! # fn main() -> fleetdesk::Result<()> {
//! let names = vec!["MV Sinar".to_string(), "KM Bahari".to_string()];
//! let bytes = serialize_for_cache(&names)?;
//! assert_eq!(&bytes[0..4], b"FDSK");
//!
//! let decoded: Vec<String> = deserialize_from_cache(&bytes)?;
//! assert_eq!(decoded, names);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for fleetdesk cache entries: b"FDSK"
pub const CACHE_MAGIC: [u8; 4] = *b"FDSK";

/// Current schema version.
///
/// Increment when a cached view-model changes shape (fields added, removed,
/// reordered or retyped; enum variants changed). Entries written under an
/// older version are evicted and reloaded instead of misread.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for cache entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    pub magic: [u8; 4],
    pub version: u32,
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for cache storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if postcard serialization fails.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from cache storage, checking magic and version.
///
/// # Errors
///
/// - `Error::DeserializationError`: corrupted postcard bytes
/// - `Error::InvalidCacheEntry`: wrong magic header
/// - `Error::VersionMismatch`: written by a different schema version
pub fn deserialize_from_cache<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: CacheEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        error!("Cache deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != CACHE_MAGIC {
        warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct Row {
        id: i64,
        code: String,
        paid: bool,
        note: Option<String>,
    }

    fn row() -> Row {
        Row {
            id: 7,
            code: "INV-2024-007".to_string(),
            paid: true,
            note: None,
        }
    }

    #[test]
    fn test_envelope_structure() {
        let bytes = serialize_for_cache(&row()).expect("serialize");
        let envelope: CacheEnvelope<Row> = postcard::from_bytes(&bytes).expect("envelope");

        assert_eq!(envelope.magic, CACHE_MAGIC);
        assert_eq!(envelope.version, CURRENT_SCHEMA_VERSION);
        assert_eq!(envelope.payload, row());
    }

    #[test]
    fn test_invalid_magic_rejected() {
        let envelope = CacheEnvelope {
            magic: *b"CKIT",
            version: CURRENT_SCHEMA_VERSION,
            payload: row(),
        };
        let bytes = postcard::to_allocvec(&envelope).expect("encode");

        match deserialize_from_cache::<Row>(&bytes) {
            Err(Error::InvalidCacheEntry(_)) => {}
            other => panic!("Expected InvalidCacheEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut envelope = CacheEnvelope::new(row());
        envelope.version = 999;
        let bytes = postcard::to_allocvec(&envelope).expect("encode");

        match deserialize_from_cache::<Row>(&bytes) {
            Err(Error::VersionMismatch { expected, found }) => {
                assert_eq!(expected, CURRENT_SCHEMA_VERSION);
                assert_eq!(found, 999);
            }
            other => panic!("Expected VersionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let mut bytes = serialize_for_cache(&row()).expect("serialize");
        bytes.truncate(bytes.len() / 2);

        match deserialize_from_cache::<Row>(&bytes) {
            Err(Error::DeserializationError(_)) => {}
            other => panic!("Expected DeserializationError, got {:?}", other),
        }
    }

    #[test]
    fn test_deterministic_serialization() {
        let a = serialize_for_cache(&row()).expect("serialize");
        let b = serialize_for_cache(&row()).expect("serialize");
        assert_eq!(a, b);
    }
}
