//! Time-bounded content cache used as the CMS and database fallback source.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::observability::metrics;

/// Default entry lifetime.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CachedEntry {
    data: Value,
    written_at: Instant,
}

/// Thread-safe `(content_type, identifier)` → payload cache with a fixed TTL.
///
/// Expired entries are evicted on read.
#[derive(Debug, Clone)]
pub struct ContentCache {
    inner: Arc<DashMap<(String, String), CachedEntry>>,
    ttl: Duration,
    enabled: bool,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, true)
    }
}

impl ContentCache {
    pub fn new(ttl: Duration, enabled: bool) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            enabled,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Fresh payload for the key, if any.
    pub fn get(&self, content_type: &str, identifier: &str) -> Option<Value> {
        let key = (content_type.to_string(), identifier.to_string());
        {
            let entry = self.inner.get(&key)?;
            if entry.written_at.elapsed() < self.ttl {
                return Some(entry.data.clone());
            }
        }
        if self
            .inner
            .remove_if(&key, |_, entry| entry.written_at.elapsed() >= self.ttl)
            .is_none()
        {
            // Rewritten since the read above.
            return self
                .inner
                .get(&key)
                .filter(|entry| entry.written_at.elapsed() < self.ttl)
                .map(|entry| entry.data.clone());
        }
        tracing::debug!(content_type, identifier, "Cache entry expired");
        metrics::record_cache_size(self.inner.len());
        None
    }

    /// Store a payload; ignored when caching is disabled.
    pub fn set(&self, content_type: &str, identifier: &str, data: Value) {
        if !self.enabled {
            return;
        }
        self.inner.insert(
            (content_type.to_string(), identifier.to_string()),
            CachedEntry {
                data,
                written_at: Instant::now(),
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    pub fn clear(&self) {
        self.inner.clear();
        tracing::info!("Content cache cleared");
        metrics::record_cache_size(0);
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.inner.len();
        self.inner.retain(|_, entry| entry.written_at.elapsed() < self.ttl);
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            metrics::record_cache_size(self.inner.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_then_get() {
        let cache = ContentCache::default();
        cache.set("posts", "home", json!({"title": "Catarata"}));
        assert_eq!(cache.get("posts", "home"), Some(json!({"title": "Catarata"})));
        assert_eq!(cache.get("posts", "other"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = ContentCache::new(Duration::from_millis(20), true);
        cache.set("posts", "home", json!(1));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("posts", "home"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = ContentCache::new(DEFAULT_CACHE_TTL, false);
        cache.set("posts", "home", json!(1));
        assert_eq!(cache.get("posts", "home"), None);
    }

    #[test]
    fn test_purge_and_clear() {
        let cache = ContentCache::new(Duration::from_millis(20), true);
        cache.set("a", "1", json!(1));
        cache.set("a", "2", json!(2));
        std::thread::sleep(Duration::from_millis(40));
        cache.set("a", "3", json!(3));
        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_read_does_not_evict_fresh_write() {
        let cache = ContentCache::new(Duration::from_secs(5), true);
        let key = ("posts".to_string(), "home".to_string());
        for _ in 0..200 {
            cache.inner.insert(
                key.clone(),
                CachedEntry {
                    data: json!("old"),
                    written_at: Instant::now().checked_sub(Duration::from_secs(10)).unwrap(),
                },
            );
            let reader = {
                let cache = cache.clone();
                std::thread::spawn(move || cache.get("posts", "home"))
            };
            cache.set("posts", "home", json!("new"));
            let _ = reader.join().unwrap();
            assert_eq!(cache.get("posts", "home"), Some(json!("new")));
        }
    }
}
