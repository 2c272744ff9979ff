//! Cache provider used by services that front slow upstream systems.
//!
//! Entries expire after the fixed TTL the provider was built with. There is no explicit
//! invalidation; callers simply re-populate after expiry.

use async_trait::async_trait;
use moka::future::Cache;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

/// Key/value cache over JSON values so a single provider can hold any payload type.
#[async_trait]
pub trait CacheProvider: Send + Sync {
    async fn get_item(&self, key: &str) -> Option<serde_json::Value>;

    async fn add_item(&self, key: String, value: serde_json::Value);
}

/// Typed read helper; entries that no longer deserialise are treated as misses.
pub async fn get_typed<T: DeserializeOwned>(cache: &dyn CacheProvider, key: &str) -> Option<T> {
    let value = cache.get_item(key).await?;
    match serde_json::from_value(value) {
        Ok(item) => Some(item),
        Err(e) => {
            tracing::warn!("discarding unreadable cache entry {}: {}", key, e);
            None
        }
    }
}

/// Typed write helper.
pub async fn add_typed<T: Serialize>(cache: &dyn CacheProvider, key: String, item: &T) {
    match serde_json::to_value(item) {
        Ok(value) => cache.add_item(key, value).await,
        Err(e) => tracing::warn!("unable to cache {}: {}", key, e),
    }
}

/// In-process cache backed by `moka`.
pub struct MemoryCacheProvider {
    cache: Cache<String, serde_json::Value>,
}

impl MemoryCacheProvider {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get_item(&self, key: &str) -> Option<serde_json::Value> {
        self.cache.get(key).await
    }

    async fn add_item(&self, key: String, value: serde_json::Value) {
        self.cache.insert(key, value).await;
    }
}
