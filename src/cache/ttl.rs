//! Concurrent TTL cache.
//!
//! # Responsibilities
//! - Map a key string to a cheaply clonable value
//! - Drop entries a fixed time after creation, however often they are used
//! - Track last access so idle entries can be evicted early
//!
//! # Design Decisions
//! - `DashMap` shards: lookups take a shard read lock, inserts and removals
//!   serialize per shard
//! - Last touch is an atomic offset from the cache epoch, so hits never need
//!   a write lock
//! - Time comes from `tokio::time::Instant`, which tests can pause and advance
//! - No capacity bound and no LRU order

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use crate::observability::metrics;

/// Hit/miss counters and current size of a cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

struct Entry<V> {
    value: V,
    created: Instant,
    /// Milliseconds since the cache epoch.
    last_touch: AtomicU64,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created) >= ttl
    }

    fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_touch.load(Ordering::Relaxed))
    }
}

/// A thread-safe cache whose entries expire after a fixed lifetime.
pub struct TtlCache<V> {
    name: &'static str,
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
    epoch: Instant,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache. `name` labels log events and metrics.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            ttl,
            epoch: Instant::now(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn offset_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.epoch).as_millis() as u64
    }

    /// Look up `key`, refreshing its last touch on a hit.
    ///
    /// An entry past its TTL counts as a miss and is removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                entry.last_touch.store(self.offset_ms(now), Ordering::Relaxed);
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_lookup(self.name, true);
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired
            && self
                .entries
                .remove_if(key, |_, e| e.is_expired(now, self.ttl))
                .is_some()
        {
            metrics::record_eviction(self.name, "ttl", 1);
            metrics::record_cache_size(self.name, self.entries.len());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        metrics::record_cache_lookup(self.name, false);
        None
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let now = Instant::now();
        self.entries.insert(
            key.into(),
            Entry {
                value,
                created: now,
                last_touch: AtomicU64::new(self.offset_ms(now)),
            },
        );
        metrics::record_cache_size(self.name, self.entries.len());
    }

    /// Return the cached value for `key`, or build and store it.
    ///
    /// Two callers racing on the same missing key both run `compile`; the
    /// later insert wins the slot.
    pub fn get_or_compile<E, F>(&self, key: &str, compile: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compile()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Presence check that does not refresh last touch or count as a lookup.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Time since `key` was last inserted or read.
    pub fn idle_for(&self, key: &str) -> Option<Duration> {
        let now_ms = self.offset_ms(Instant::now());
        self.entries
            .get(key)
            .map(|e| Duration::from_millis(e.idle_ms(now_ms)))
    }

    /// Remove every entry idle for longer than `idle`. Returns how many went.
    pub fn clear_idle_older_than(&self, idle: Duration) -> usize {
        let now_ms = self.offset_ms(Instant::now());
        let limit = idle.as_millis() as u64;
        let mut removed = 0;
        self.entries.retain(|_, e| {
            let keep = e.idle_ms(now_ms) <= limit;
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            tracing::debug!(cache = self.name, removed, idle_secs = idle.as_secs(), "Evicted idle entries");
            metrics::record_eviction(self.name, "pressure", removed);
            metrics::record_cache_size(self.name, self.entries.len());
        }
        removed
    }

    /// Remove every entry past its TTL. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, e| {
            let keep = !e.is_expired(now, self.ttl);
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            tracing::debug!(cache = self.name, removed, "Purged expired entries");
            metrics::record_eviction(self.name, "ttl", removed);
            metrics::record_cache_size(self.name, self.entries.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
        metrics::record_cache_size(self.name, 0);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time;

    fn cache() -> TtlCache<u32> {
        TtlCache::new("test", Duration::from_secs(2 * 60 * 60))
    }

    #[test]
    fn test_get_or_compile() {
        let cache = cache();
        let mut calls = 0;

        let v: Result<u32, ()> = cache.get_or_compile("a", || {
            calls += 1;
            Ok(7)
        });
        assert_eq!(v, Ok(7));

        let v: Result<u32, ()> = cache.get_or_compile("a", || {
            calls += 1;
            Ok(8)
        });
        assert_eq!(v, Ok(7));
        assert_eq!(calls, 1);

        let stats = cache.stats();
        assert_eq!(stats, CacheStats { entries: 1, hits: 1, misses: 1 });
    }

    #[test]
    fn test_failed_compile_is_not_stored() {
        let cache = cache();
        let v = cache.get_or_compile("bad", || Err::<u32, _>("nope"));
        assert_eq!(v, Err("nope"));
        assert!(!cache.contains_key("bad"));
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = cache();
        cache.insert("k", 1);
        cache.insert("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry_ignores_use() {
        let cache = TtlCache::new("test", Duration::from_secs(60));
        cache.insert("k", 1u32);

        time::advance(Duration::from_secs(50)).await;
        assert_eq!(cache.get("k"), Some(1));

        time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = TtlCache::new("test", Duration::from_secs(60));
        cache.insert("old", 1u32);
        time::advance(Duration::from_secs(30)).await;
        cache.insert("new", 2u32);
        time::advance(Duration::from_secs(31)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert!(!cache.contains_key("old"));
        assert!(cache.contains_key("new"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_idle_older_than() {
        let cache = cache();
        cache.insert("idle", 1u32);
        cache.insert("busy", 2u32);

        time::advance(Duration::from_secs(9 * 60)).await;
        assert_eq!(cache.get("busy"), Some(2));
        time::advance(Duration::from_secs(2 * 60)).await;

        assert_eq!(cache.idle_for("idle"), Some(Duration::from_secs(11 * 60)));
        assert_eq!(cache.clear_idle_older_than(Duration::from_secs(10 * 60)), 1);
        assert!(!cache.contains_key("idle"));
        assert!(cache.contains_key("busy"));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(cache());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100u32 {
                        let key = format!("k{}", i % 10);
                        let v: Result<u32, ()> = cache.get_or_compile(&key, || Ok(i % 10));
                        assert_eq!(v, Ok(i % 10));
                        if t == 0 && i % 25 == 0 {
                            cache.clear_idle_older_than(Duration::ZERO);
                        }
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert!(cache.len() <= 10);
    }
}
