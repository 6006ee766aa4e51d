//! Cache-aside support for page results.
//!
//! The [`PageCache`] trait is the boundary to the external key-value store.
//! Cached values are schema-tagged envelopes: a reader that finds an envelope
//! with an unexpected schema treats it as a miss instead of deserializing
//! whatever happens to be there. Cache failures never surface to callers —
//! reads degrade to misses and writes are dropped, both logged.

mod keys;
mod memory;
mod redis;

pub use keys::{recipe_detail_key, recipe_lists_pattern, recommend_key, search_key};
pub use memory::InMemoryCache;
pub use redis::RedisCache;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error from the cache backend. Always swallowed by the orchestrators.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Key-value cache with TTLs and best-effort semantics.
#[async_trait]
pub trait PageCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Delete every key matching a glob-style pattern; returns the number of
    /// keys removed.
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;
}

/// Serialized cache entry: a schema tag plus the payload.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    schema: String,
    data: T,
}

/// Read a schema-tagged value. Backend errors, parse failures, and schema
/// mismatches all degrade to `None`.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    cache: &dyn PageCache,
    key: &str,
    schema: &str,
) -> Option<T> {
    let raw = match cache.get(key).await {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::warn!(error = %e, cache_key = key, "cache read failed");
            return None;
        }
    };
    match serde_json::from_str::<Envelope<T>>(&raw) {
        Ok(envelope) if envelope.schema == schema => {
            tracing::debug!(cache_key = key, "cache hit");
            Some(envelope.data)
        }
        Ok(envelope) => {
            tracing::warn!(
                cache_key = key,
                found = %envelope.schema,
                expected = schema,
                "cached envelope has wrong schema, treating as miss"
            );
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, cache_key = key, "cached value unparseable, treating as miss");
            None
        }
    }
}

/// Write a schema-tagged value. Failures are logged and dropped.
pub(crate) async fn write_envelope<T: Serialize>(
    cache: &dyn PageCache,
    key: &str,
    schema: &str,
    data: &T,
    ttl: Duration,
) {
    let envelope = Envelope {
        schema: schema.to_string(),
        data,
    };
    let raw = match serde_json::to_string(&envelope) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(error = %e, cache_key = key, "failed to serialize cache entry");
            return;
        }
    };
    if let Err(e) = cache.set(key, &raw, ttl).await {
        tracing::warn!(error = %e, cache_key = key, "cache write failed");
    }
}
