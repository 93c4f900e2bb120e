//! The resolved-content cache.
//!
//! An explicit, locale-keyed cache service with a bounded freshness
//! window and tag-based invalidation. No hidden global state: the
//! engine owns one instance, and tests can own their own.
//!
//! Invalidation is invoked by the mutation pipeline after its write
//! transaction commits, never before, so a concurrent `resolve` can
//! never re-cache a mid-transaction read.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use maison_core::locale::Locale;

/// Invalidation tags. Every mutation invalidates the tags its write
/// can be seen through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTag {
    Homepage,
    Collections,
    Editorial,
}

struct Entry<T> {
    value: Arc<T>,
    tags: Vec<CacheTag>,
    inserted_at: Instant,
}

/// A locale-keyed cache with TTL freshness and tag invalidation.
pub struct ContentCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<Locale, Entry<T>>>,
}

impl<T> ContentCache<T> {
    pub fn new(ttl: Duration) -> ContentCache<T> {
        ContentCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached value for a locale if it is still fresh.
    pub fn get(&self, locale: Locale) -> Option<Arc<T>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&locale)
            .filter(|entry| entry.inserted_at.elapsed() <= self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Store a value for a locale under the given invalidation tags.
    pub fn insert(&self, locale: Locale, value: Arc<T>, tags: Vec<CacheTag>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            locale,
            Entry {
                value,
                tags,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop every entry carrying the tag, across all locales.
    pub fn invalidate(&self, tag: CacheTag) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, entry| !entry.tags.contains(&tag));
    }

    /// Drop everything.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_ms: u64) -> ContentCache<String> {
        ContentCache::new(Duration::from_millis(ttl_ms))
    }

    #[test]
    fn get_returns_fresh_entry() {
        let cache = cache(10_000);
        cache.insert(
            Locale::Fr,
            Arc::new("v1".to_string()),
            vec![CacheTag::Homepage],
        );
        assert_eq!(cache.get(Locale::Fr).as_deref(), Some(&"v1".to_string()));
        assert!(cache.get(Locale::En).is_none());
    }

    #[test]
    fn stale_entry_is_a_miss() {
        let cache = cache(0);
        cache.insert(
            Locale::Fr,
            Arc::new("v1".to_string()),
            vec![CacheTag::Homepage],
        );
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get(Locale::Fr).is_none());
    }

    #[test]
    fn invalidate_drops_matching_tags_across_locales() {
        let cache = cache(10_000);
        cache.insert(
            Locale::Fr,
            Arc::new("fr".to_string()),
            vec![CacheTag::Homepage, CacheTag::Collections],
        );
        cache.insert(
            Locale::En,
            Arc::new("en".to_string()),
            vec![CacheTag::Homepage, CacheTag::Editorial],
        );

        cache.invalidate(CacheTag::Collections);
        assert!(cache.get(Locale::Fr).is_none());
        assert!(cache.get(Locale::En).is_some());

        cache.invalidate(CacheTag::Homepage);
        assert!(cache.get(Locale::En).is_none());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let cache = cache(10_000);
        cache.insert(Locale::Fr, Arc::new("v1".to_string()), vec![]);
        cache.insert(Locale::Fr, Arc::new("v2".to_string()), vec![]);
        assert_eq!(cache.get(Locale::Fr).as_deref(), Some(&"v2".to_string()));
    }
}
