//! Cache metrics.
//!
//! Every series carries a `cache` label naming the cache instance.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Metric names for the cache layer.
pub mod names {
    /// Lookups that returned a live value.
    pub const CACHE_HITS_TOTAL: &str = "roster_cache_hits_total";
    /// Lookups that found nothing or an expired entry.
    pub const CACHE_MISSES_TOTAL: &str = "roster_cache_misses_total";
    /// Entries removed because their deadline passed.
    pub const CACHE_EVICTIONS_TOTAL: &str = "roster_cache_evictions_total";
    /// Entries currently held, expired or not.
    pub const CACHE_ENTRIES: &str = "roster_cache_entries";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(
        names::CACHE_EVICTIONS_TOTAL,
        "Total number of entries evicted after expiry"
    );
    describe_gauge!(names::CACHE_ENTRIES, "Current number of cache entries");
}

/// Cache metrics recorder.
#[derive(Clone, Copy)]
pub struct CacheMetrics;

impl CacheMetrics {
    /// Record a hit.
    pub fn hit(cache: &'static str) {
        counter!(names::CACHE_HITS_TOTAL, "cache" => cache).increment(1);
    }

    /// Record a miss.
    pub fn miss(cache: &'static str) {
        counter!(names::CACHE_MISSES_TOTAL, "cache" => cache).increment(1);
    }

    /// Record expired entries being evicted.
    pub fn evicted(cache: &'static str, count: usize) {
        if count > 0 {
            counter!(names::CACHE_EVICTIONS_TOTAL, "cache" => cache).increment(count as u64);
        }
    }

    /// Record the current number of entries.
    #[allow(clippy::cast_precision_loss)]
    pub fn entries(cache: &'static str, len: usize) {
        gauge!(names::CACHE_ENTRIES, "cache" => cache).set(len as f64);
    }
}
