//! Background purge of expired cache entries.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::TtlCache;

/// Periodically purges expired entries from one cache.
///
/// The sweeper only holds a weak reference, so it never keeps its cache
/// alive; the loop ends on [`Sweeper::stop`] or once the cache is dropped.
pub struct Sweeper {
    cache_name: &'static str,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns a sweeper for `cache` that runs every `every`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<V>(cache: &Arc<TtlCache<V>>, every: Duration) -> Self
    where
        V: Clone + Send + Sync + 'static,
    {
        let cache_name = cache.name();
        let weak: Weak<TtlCache<V>> = Arc::downgrade(cache);
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);
        let period = every.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            info!(cache = cache_name, interval_ms = period.as_millis(), "Cache sweeper started");

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        debug!(cache = cache_name, "Cache sweeper received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(cache) = weak.upgrade() else {
                            debug!(cache = cache_name, "Cache dropped, sweeper exiting");
                            break;
                        };
                        let purged = cache.purge_expired();
                        if purged > 0 {
                            debug!(cache = cache_name, purged, remaining = cache.len(), "Purged expired entries");
                        }
                    }
                }
            }

            info!(cache = cache_name, "Cache sweeper stopped");
        });

        Self {
            cache_name,
            shutdown_tx,
            handle,
        }
    }

    /// Returns true once the sweep loop has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Signals the sweeper to stop and waits for the loop to exit.
    pub async fn stop(self) {
        // An error only means the loop already exited.
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            warn!(cache = self.cache_name, error = %e, "Cache sweeper task failed");
        }
    }
}

impl std::fmt::Debug for Sweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sweeper")
            .field("cache", &self.cache_name)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweeper_purges_unread_entries() {
        let cache = Arc::new(TtlCache::new("sweep"));
        cache.set("dead", 1, Duration::from_millis(10));
        cache.set("alive", 2, Duration::from_secs(60));

        let sweeper = Sweeper::spawn(&cache, Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;

        // Never read, yet gone.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("alive"), Some(2));

        sweeper.stop().await;
    }

    #[tokio::test]
    async fn test_stop_joins_the_loop() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new("sweep"));
        let sweeper = Sweeper::spawn(&cache, Duration::from_secs(3600));
        assert!(!sweeper.is_finished());
        sweeper.stop().await;
        // The cache is still usable after the sweeper is gone.
        cache.set("k", 1, Duration::from_secs(1));
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test]
    async fn test_sweeper_exits_when_cache_dropped() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new("sweep"));
        let sweeper = Sweeper::spawn(&cache, Duration::from_millis(10));
        drop(cache);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sweeper.is_finished());
        sweeper.stop().await;
    }
}
