//! Caching infrastructure for the service layer.
//!
//! Two typed caches back the service: one for single-person views and one for
//! listings. Both are plain [`TtlCache`] instances created by the caller and
//! handed to every component that needs them.

pub mod cache_keys;

use roster_cache::{Sweeper, TtlCache};
use roster_config::CacheConfig;
use roster_core::{Page, PersonView};
use std::sync::Arc;
use std::time::Duration;

/// Default TTL for a single-person view (5 minutes).
pub const VIEW_TTL: Duration = Duration::from_secs(300);

/// Default TTL for a listing page (1 minute).
pub const LISTING_TTL: Duration = Duration::from_secs(60);

/// Default TTL for a last-name search (2 minutes).
pub const SEARCH_TTL: Duration = Duration::from_secs(120);

/// Cache of assembled person views, keyed by `entity:<id>`.
pub type ViewCache = TtlCache<PersonView>;

/// Cache of listings, keyed under `listing:`.
pub type ListingCache = TtlCache<CachedListing>;

/// A cached listing.
///
/// Pages and searches share the `listing:` namespace so that one prefix
/// delete clears both. Reading an entry as the wrong shape is a miss.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedListing {
    Page(Page<PersonView>),
    Search(Vec<PersonView>),
}

impl CachedListing {
    /// Returns the page if this entry holds one.
    #[must_use]
    pub fn into_page(self) -> Option<Page<PersonView>> {
        match self {
            Self::Page(page) => Some(page),
            Self::Search(_) => None,
        }
    }

    /// Returns the search results if this entry holds them.
    #[must_use]
    pub fn into_search(self) -> Option<Vec<PersonView>> {
        match self {
            Self::Search(views) => Some(views),
            Self::Page(_) => None,
        }
    }
}

/// Lifetimes of the cached values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub view: Duration,
    pub listing: Duration,
    pub search: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            view: VIEW_TTL,
            listing: LISTING_TTL,
            search: SEARCH_TTL,
        }
    }
}

impl From<&CacheConfig> for CacheTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            view: config.view_ttl(),
            listing: config.listing_ttl(),
            search: config.search_ttl(),
        }
    }
}

/// The caches shared by the service components.
#[derive(Debug, Clone)]
pub struct ServiceCaches {
    pub views: Arc<ViewCache>,
    pub listings: Arc<ListingCache>,
}

impl ServiceCaches {
    /// Creates empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self {
            views: Arc::new(ViewCache::new("views")),
            listings: Arc::new(ListingCache::new("listings")),
        }
    }

    /// Starts one background sweeper per cache.
    ///
    /// The caller owns the returned sweepers and should stop them on
    /// shutdown.
    #[must_use]
    pub fn spawn_sweepers(&self, every: Duration) -> Vec<Sweeper> {
        vec![
            Sweeper::spawn(&self.views, every),
            Sweeper::spawn(&self.listings, every),
        ]
    }
}

impl Default for ServiceCaches {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::PageRequest;

    #[test]
    fn test_cached_listing_wrong_shape_is_none() {
        let page = CachedListing::Page(Page::empty(PageRequest::first()));
        assert!(page.clone().into_search().is_none());
        assert!(page.into_page().is_some());

        let search = CachedListing::Search(Vec::new());
        assert!(search.clone().into_page().is_none());
        assert_eq!(search.into_search(), Some(Vec::new()));
    }

    #[test]
    fn test_ttls_from_config() {
        let config = CacheConfig {
            view_ttl_secs: 10,
            listing_ttl_secs: 5,
            search_ttl_secs: 7,
            sweep_interval_secs: 1,
        };
        let ttls = CacheTtls::from(&config);
        assert_eq!(ttls.view, Duration::from_secs(10));
        assert_eq!(ttls.listing, Duration::from_secs(5));
        assert_eq!(ttls.search, Duration::from_secs(7));
    }

    #[test]
    fn test_default_ttls() {
        let ttls = CacheTtls::default();
        assert_eq!(ttls.view, Duration::from_secs(300));
        assert_eq!(ttls.listing, Duration::from_secs(60));
        assert_eq!(ttls.search, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_spawn_sweepers() {
        let caches = ServiceCaches::new();
        let sweepers = caches.spawn_sweepers(Duration::from_secs(60));
        assert_eq!(sweepers.len(), 2);
        for sweeper in sweepers {
            sweeper.stop().await;
        }
    }
}
