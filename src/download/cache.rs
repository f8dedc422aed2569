//! TTL cache for raw --dump-json metadata.
//!
//! A single extraction call powers the info endpoint, the format
//! listing, and the bot preview, so the raw JSON is kept around for a
//! short window per URL.

use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::core::config;

struct CachedItem {
    data: Arc<Value>,
    cached_at: Instant,
}

/// Cache of raw yt-dlp metadata keyed by URL.
pub struct InfoCache {
    cache: Mutex<HashMap<String, CachedItem>>,
    ttl: Duration,
}

impl InfoCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Value>> {
        let mut cache = self.cache.lock().await;
        if let Some(item) = cache.get(key) {
            if item.cached_at.elapsed() < self.ttl {
                return Some(Arc::clone(&item.data));
            }
            cache.remove(key);
        }
        None
    }

    pub async fn set(&self, key: String, data: Arc<Value>) {
        let mut cache = self.cache.lock().await;
        cache.insert(
            key,
            CachedItem {
                data,
                cached_at: Instant::now(),
            },
        );
    }

    /// Drops expired entries.
    pub async fn cleanup(&self) {
        let mut cache = self.cache.lock().await;
        cache.retain(|_, item| item.cached_at.elapsed() < self.ttl);
    }

    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.lock().await.is_empty()
    }
}

/// Global metadata cache instance.
pub static INFO_CACHE: Lazy<InfoCache> = Lazy::new(|| InfoCache::new(config::cache::info_ttl()));
