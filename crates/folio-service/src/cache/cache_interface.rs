//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use folio_core::FolioResult;
use shaku::Interface;
use std::time::Duration;
use tracing::warn;

/// Cache interface for storing and retrieving cached data.
///
/// Uses JSON strings for type-erased storage to maintain dyn-compatibility.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> FolioResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> FolioResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> FolioResult<bool>;

    /// Check if a key exists in the cache.
    async fn exists(&self, key: &str) -> FolioResult<bool>;

    /// Delete every key matching a glob pattern (`*`, `?`).
    ///
    /// Returns the number of keys deleted.
    async fn delete_pattern(&self, pattern: &str) -> FolioResult<u64>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Extension trait with typed methods for convenience.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> FolioResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> FolioResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Get a value or compute and cache it if not present.
    ///
    /// A failing or undecodable cache read counts as a miss and a failing
    /// write is dropped: only `factory` errors reach the caller.
    async fn get_or_set<T, F, Fut>(&self, key: &str, ttl: Duration, factory: F) -> FolioResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = FolioResult<T>> + Send,
    {
        match self.get::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(key, error = %e, "Cache read failed, falling back to database"),
        }

        let value = factory().await?;

        if let Err(e) = self.set(key, &value, ttl).await {
            warn!(key, error = %e, "Failed to populate cache");
        }

        Ok(value)
    }

    /// Delete every key matching any of `patterns`.
    ///
    /// Runs after the database write has committed, so failures are logged
    /// and never surfaced.
    async fn invalidate(&self, patterns: &[String]) {
        for pattern in patterns {
            match self.delete_pattern(pattern).await {
                Ok(deleted) => {
                    tracing::debug!(pattern = %pattern, deleted, "Invalidated cache entries");
                }
                Err(e) => warn!(pattern = %pattern, error = %e, "Cache invalidation failed"),
            }
        }
    }
}

// Blanket implementation for all CacheInterface implementations
impl<T: CacheInterface + ?Sized> CacheExt for T {}
