use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-process cache for the read-mostly pipeline surfaces (agent profiles,
/// matchmaker lists). Entries expire on a TTL so status transitions written
/// by the external outreach process become visible without an invalidation
/// hook from that side.
pub struct CacheManager {
    cache: moka::future::Cache<String, Vec<u8>>,
}

impl CacheManager {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Get a cached value, or `CacheMiss`.
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.cache.get(key).await {
            tracing::trace!("Cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Store a value under the configured TTL.
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.cache.insert(key.to_string(), bytes).await;
        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Drop a single entry.
    pub async fn delete(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    /// Drop the pipeline entries for a user after a swipe that may have
    /// formed a match.
    pub async fn invalidate_pipeline(&self, user_id: i32) {
        self.delete(&CacheKey::matchmaker(user_id)).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for a user's agent profile
    pub fn agent(user_id: i32) -> String {
        format!("agent:{}", user_id)
    }

    /// Key for a user's matchmaker record list
    pub fn matchmaker(user_id: i32) -> String {
        format!("matchmaker:{}", user_id)
    }
}
