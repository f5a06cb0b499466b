//! Whole-page response cache for the anonymous home page.
//!
//! Time-boxed: an entry is served as-is until its TTL elapses, regardless of
//! data mutations underneath. Invalidation is TTL expiry or an explicit
//! `clear`; nothing else touches stored entries.

use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use lru::LruCache;

/// Cache key for the home page listing. The query string is not part of the
/// key, so every paginated variant of the page shares this one slot.
pub const INDEX_CACHE_KEY: &str = "index_page";

const DEFAULT_CAPACITY: usize = 16;

/// A fully serialized response body, stamped with its store time.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub content_type: String,
    pub body: String,
    stored_at: Instant,
}

struct Store {
    entries: RwLock<LruCache<String, CachedPage>>,
    ttl: Duration,
}

/// Injected page-cache service held in application state.
///
/// Cloning shares the underlying store, so every handler and test sees the
/// same entries.
#[derive(Clone)]
pub struct PageCache {
    store: Arc<Store>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, ttl)
    }

    pub fn with_capacity(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(Store {
                entries: RwLock::new(LruCache::new(capacity)),
                ttl,
            }),
        }
    }

    /// Returns the entry stored under `key` while it is still fresh.
    /// An expired entry is evicted on the way out.
    pub fn get(&self, key: &str) -> Option<CachedPage> {
        let mut entries = self
            .store
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(page) if page.stored_at.elapsed() < self.store.ttl => Some(page.clone()),
            Some(_) => {
                entries.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, content_type: &str, body: String) {
        let page = CachedPage {
            content_type: content_type.to_string(),
            body,
            stored_at: Instant::now(),
        };
        self.store
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .put(key.to_string(), page);
    }

    pub fn clear(&self) {
        self.store
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn ttl(&self) -> Duration {
        self.store.ttl
    }
}

#[cfg(test)]
mod tests {
    use std::thread::sleep;

    use super::*;

    #[test]
    fn roundtrip_within_ttl() {
        let cache = PageCache::new(Duration::from_secs(60));

        assert!(cache.get(INDEX_CACHE_KEY).is_none());

        cache.set(INDEX_CACHE_KEY, "application/json", "{\"posts\":[]}".to_string());

        let page = cache.get(INDEX_CACHE_KEY).expect("cached page");
        assert_eq!(page.content_type, "application/json");
        assert_eq!(page.body, "{\"posts\":[]}");
    }

    #[test]
    fn expires_after_ttl() {
        let cache = PageCache::new(Duration::from_millis(20));

        cache.set(INDEX_CACHE_KEY, "application/json", "stale".to_string());
        assert!(cache.get(INDEX_CACHE_KEY).is_some());

        sleep(Duration::from_millis(30));
        assert!(cache.get(INDEX_CACHE_KEY).is_none());
    }

    #[test]
    fn repopulating_restarts_the_clock() {
        let cache = PageCache::new(Duration::from_millis(40));

        cache.set(INDEX_CACHE_KEY, "application/json", "first".to_string());
        sleep(Duration::from_millis(25));
        cache.set(INDEX_CACHE_KEY, "application/json", "second".to_string());
        sleep(Duration::from_millis(25));

        let page = cache.get(INDEX_CACHE_KEY).expect("refreshed entry");
        assert_eq!(page.body, "second");
    }

    #[test]
    fn explicit_clear_empties_the_slot() {
        let cache = PageCache::new(Duration::from_secs(60));

        cache.set(INDEX_CACHE_KEY, "application/json", "body".to_string());
        cache.clear();

        assert!(cache.get(INDEX_CACHE_KEY).is_none());
    }

    #[test]
    fn keys_do_not_bleed_into_each_other() {
        let cache = PageCache::new(Duration::from_secs(60));

        cache.set(INDEX_CACHE_KEY, "application/json", "index".to_string());

        assert!(cache.get("other_page").is_none());
        assert_eq!(cache.get(INDEX_CACHE_KEY).expect("index entry").body, "index");
    }

    #[test]
    fn clones_share_one_store() {
        let cache = PageCache::new(Duration::from_secs(60));
        let handle = cache.clone();

        cache.set(INDEX_CACHE_KEY, "application/json", "shared".to_string());
        assert_eq!(handle.get(INDEX_CACHE_KEY).expect("shared entry").body, "shared");

        handle.clear();
        assert!(cache.get(INDEX_CACHE_KEY).is_none());
    }
}
