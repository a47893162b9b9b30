//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::trace;

use crate::metrics::CacheMetrics;

/// Cache entry with a deadline.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// A thread-safe string-keyed cache whose entries expire after a TTL.
///
/// All entries live in one map behind a single reader/writer lock. Lookups
/// share the read lock; every mutation takes the write lock for one map
/// operation, so a reader never sees a half-written entry and racing writes
/// to the same key resolve last-writer-wins.
///
/// Every explicit removal (`delete`, `delete_by_prefix`, `clear`) advances
/// the cache's generation. A reader that computes a value from slower
/// sources snapshots [`generation`](Self::generation) first and stores the
/// result with [`set_if_current`](Self::set_if_current), so a value computed
/// before an invalidation can never be stored after it.
pub struct TtlCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    // only advanced while the write lock is held
    generation: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache. `name` labels its metrics and logs.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the name of this cache.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Stores `value` under `key` until `ttl` has elapsed, replacing any
    /// existing entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let expires_at = Instant::now() + ttl;
        let len = {
            let mut entries = self.entries.write();
            entries.insert(key, CacheEntry { value, expires_at });
            entries.len()
        };
        CacheMetrics::entries(self.name, len);
    }

    /// Returns the current invalidation generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Stores `value` like [`set`](Self::set), unless an invalidation has
    /// happened since `generation` was read.
    ///
    /// Returns false if the value was discarded.
    pub fn set_if_current(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: Duration,
        generation: u64,
    ) -> bool {
        let key = key.into();
        let expires_at = Instant::now() + ttl;
        let len = {
            let mut entries = self.entries.write();
            if self.generation.load(Ordering::Acquire) != generation {
                trace!(
                    cache = self.name,
                    key = %key,
                    "Discarded value computed before an invalidation"
                );
                return false;
            }
            entries.insert(key, CacheEntry { value, expires_at });
            entries.len()
        };
        CacheMetrics::entries(self.name, len);
        true
    }

    fn advance_generation(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Returns the live value for `key`.
    ///
    /// An expired entry is treated as absent and evicted on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(Instant::now()) => {
                    CacheMetrics::hit(self.name);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    CacheMetrics::miss(self.name);
                    return None;
                }
            }
        }

        // The read lock is released before the write lock is taken, so a
        // fresh `set` may have landed in between. Only evict what is still
        // expired; a refreshed entry is returned instead.
        let len = {
            let mut entries = self.entries.write();
            let refreshed = match entries.get(key) {
                Some(entry) if !entry.is_expired_at(Instant::now()) => Some(entry.value.clone()),
                Some(_) => None,
                None => {
                    CacheMetrics::miss(self.name);
                    return None;
                }
            };
            if refreshed.is_some() {
                CacheMetrics::hit(self.name);
                return refreshed;
            }
            entries.remove(key);
            entries.len()
        };

        trace!(cache = self.name, key, "Evicted expired entry on read");
        CacheMetrics::evicted(self.name, 1);
        CacheMetrics::entries(self.name, len);
        CacheMetrics::miss(self.name);
        None
    }

    /// Removes the entry for `key`. Returns true if one was present.
    pub fn delete(&self, key: &str) -> bool {
        let (removed, len) = {
            let mut entries = self.entries.write();
            self.advance_generation();
            let removed = entries.remove(key).is_some();
            (removed, entries.len())
        };
        CacheMetrics::entries(self.name, len);
        removed
    }

    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn delete_by_prefix(&self, prefix: &str) -> usize {
        let (removed, len) = {
            let mut entries = self.entries.write();
            self.advance_generation();
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            (before - entries.len(), entries.len())
        };
        CacheMetrics::entries(self.name, len);
        removed
    }

    /// Removes every entry whose deadline has passed.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let (removed, len) = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            (before - entries.len(), entries.len())
        };
        CacheMetrics::evicted(self.name, removed);
        CacheMetrics::entries(self.name, len);
        removed
    }

    /// Removes all entries.
    pub fn clear(&self) {
        {
            let mut entries = self.entries.write();
            self.advance_generation();
            entries.clear();
        }
        CacheMetrics::entries(self.name, 0);
    }

    /// Returns the number of stored entries, including expired ones not yet
    /// purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired_at(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            live_entries: entries.len().saturating_sub(expired),
        }
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("name", &self.name)
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub live_entries: usize,
}
