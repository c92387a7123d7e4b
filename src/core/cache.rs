//! Expiring in-memory cache
//!
//! An LRU-bounded map whose entries stop being served once they are older than
//! a fixed time-to-live. The cache is an ordinary value owned by whoever needs
//! it; there is no process-global instance. Every read and write has an `_at`
//! variant taking the current [`Instant`] so tests can drive expiry without
//! sleeping.

use lru::LruCache;
use std::{
    hash::Hash,
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use crate::WeekId;

/// Key usable with [`ExpiringCache`].
pub trait CacheKey: Hash + Eq + Clone + Send + Sync {
    /// Stable string form, used in logs and diagnostics.
    fn to_cache_key(&self) -> String;
}

/// Key for a week's prediction map: `predictions_{weekId}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictionsCacheKey {
    pub week_id: WeekId,
}

impl CacheKey for PredictionsCacheKey {
    fn to_cache_key(&self) -> String {
        format!("predictions_{}", self.week_id)
    }
}

/// Key for a week's fixture list: `fixtures_{weekId}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixturesCacheKey {
    pub week_id: WeekId,
}

impl CacheKey for FixturesCacheKey {
    fn to_cache_key(&self) -> String {
        format!("fixtures_{}", self.week_id)
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// LRU cache with a per-entry time-to-live.
pub struct ExpiringCache<K, V>
where
    K: CacheKey,
    V: Clone,
{
    entries: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: CacheKey,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries, each valid for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let bounded = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(bounded)),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, Entry<V>>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Get a live entry as of `now`. Expired entries are evicted on the way.
    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut entries = self.lock();
        let fresh = match entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.stored_at) < self.ttl,
            None => return None,
        };

        if fresh {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.pop(key);
            tracing::debug!(key = %key.to_cache_key(), "cache entry expired");
            None
        }
    }

    /// Store `value`, stamping it with `now`.
    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        self.lock().put(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    /// Drop one entry. Returns whether anything was removed.
    pub fn invalidate(&self, key: &K) -> bool {
        self.lock().pop(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(week: &str) -> PredictionsCacheKey {
        PredictionsCacheKey {
            week_id: WeekId::new(week),
        }
    }

    #[test]
    fn test_cache_key_strings() {
        assert_eq!(key("w1").to_cache_key(), "predictions_w1");
        let fixtures = FixturesCacheKey {
            week_id: WeekId::new("2024-08-16_2024-08-19"),
        };
        assert_eq!(fixtures.to_cache_key(), "fixtures_2024-08-16_2024-08-19");
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache: ExpiringCache<PredictionsCacheKey, u32> =
            ExpiringCache::new(4, Duration::from_secs(300));
        let t0 = Instant::now();

        cache.insert_at(key("w1"), 7, t0);
        assert_eq!(cache.get_at(&key("w1"), t0 + Duration::from_secs(299)), Some(7));
    }

    #[test]
    fn test_miss_at_and_after_ttl() {
        let cache: ExpiringCache<PredictionsCacheKey, u32> =
            ExpiringCache::new(4, Duration::from_secs(300));
        let t0 = Instant::now();

        cache.insert_at(key("w1"), 7, t0);
        assert_eq!(cache.get_at(&key("w1"), t0 + Duration::from_secs(300)), None);
        // Expired entry was evicted
        assert_eq!(cache.lock().len(), 0);
    }

    #[test]
    fn test_invalidate_single_key() {
        let cache: ExpiringCache<PredictionsCacheKey, u32> =
            ExpiringCache::new(4, Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at(key("w1"), 1, t0);
        cache.insert_at(key("w2"), 2, t0);

        assert!(cache.invalidate(&key("w1")));
        assert!(!cache.invalidate(&key("w1")));
        assert_eq!(cache.get_at(&key("w2"), t0), Some(2));
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache: ExpiringCache<FixturesCacheKey, u32> =
            ExpiringCache::new(4, Duration::from_secs(60));
        let t0 = Instant::now();
        let fixtures = FixturesCacheKey {
            week_id: WeekId::new("w1"),
        };
        cache.insert_at(fixtures.clone(), 1, t0);

        cache.clear();
        assert_eq!(cache.get_at(&fixtures, t0), None);
    }

    #[test]
    fn test_lru_capacity_bound() {
        let cache: ExpiringCache<PredictionsCacheKey, u32> =
            ExpiringCache::new(2, Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at(key("w1"), 1, t0);
        cache.insert_at(key("w2"), 2, t0);
        cache.insert_at(key("w3"), 3, t0);

        assert_eq!(cache.lock().len(), 2);
        assert_eq!(cache.get_at(&key("w1"), t0), None);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache: ExpiringCache<PredictionsCacheKey, u32> =
            ExpiringCache::new(0, Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert_at(key("w1"), 1, t0);
        cache.insert_at(key("w2"), 2, t0);

        assert_eq!(cache.get_at(&key("w1"), t0), None);
        assert_eq!(cache.get_at(&key("w2"), t0), Some(2));
    }
}
