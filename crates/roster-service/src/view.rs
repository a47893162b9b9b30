//! Read-through assembly of person views.

use crate::cache::{cache_keys, ListingCache, ServiceCaches, ViewCache};
use roster_core::{Person, PersonId, PersonView, RosterError, RosterResult};
use roster_repository::PersonRepository;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Builds [`PersonView`]s from the store and memoizes them.
///
/// A view is inserted into the cache only once the person, the contacts and
/// the relationship set have all been resolved. The contact and relationship
/// fetches run concurrently; either one failing degrades to an empty
/// collection instead of failing the view. Only a missing person is fatal.
///
/// Dropping a [`get_view`](Self::get_view) future part way through cancels
/// both sub-fetches and leaves the cache untouched. A view whose reads
/// overlapped an invalidation is returned but not cached, since it may
/// predate the write that caused the invalidation.
pub struct ViewAssembler {
    repository: Arc<dyn PersonRepository>,
    views: Arc<ViewCache>,
    listings: Arc<ListingCache>,
    ttl: Duration,
}

impl ViewAssembler {
    /// Creates a new assembler over `repository` and the shared caches.
    pub fn new(repository: Arc<dyn PersonRepository>, caches: &ServiceCaches, ttl: Duration) -> Self {
        Self {
            repository,
            views: Arc::clone(&caches.views),
            listings: Arc::clone(&caches.listings),
            ttl,
        }
    }

    /// Returns the view of `id`, from the cache when possible.
    pub async fn get_view(&self, id: PersonId) -> RosterResult<PersonView> {
        let key = cache_keys::entity(id);
        if let Some(view) = self.views.get(&key) {
            debug!("View cache hit: {}", key);
            return Ok(view);
        }

        debug!("View cache miss: {}", key);
        let generation = self.views.generation();
        let person = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("Person", id))?;

        let view = self.assemble(person).await;
        if !self.views.set_if_current(key, view.clone(), self.ttl, generation) {
            debug!("Person {} was invalidated while assembling, not caching", id);
        }
        Ok(view)
    }

    /// Completes `person` with its contacts and relationships.
    ///
    /// Does not touch the cache.
    pub async fn assemble(&self, person: Person) -> PersonView {
        let id = person.id;
        let (contacts, targets) = tokio::join!(
            self.repository.list_contacts(id),
            self.repository.list_edge_targets(id),
        );

        let contacts = contacts.unwrap_or_else(|e| {
            warn!("Failed to load contacts of person {}, using none: {}", id, e);
            Vec::new()
        });
        let relationships = targets.map_or_else(
            |e| {
                warn!("Failed to load relationships of person {}, using none: {}", id, e);
                BTreeSet::new()
            },
            |targets| targets.into_iter().collect(),
        );

        PersonView {
            person,
            contacts,
            relationships,
        }
    }

    /// Drops the cached view of `id` and every cached listing.
    pub fn invalidate_entity(&self, id: PersonId) {
        let removed = self.views.delete(&cache_keys::entity(id));
        let listings = self.invalidate_listings();
        debug!(
            "Invalidated person {} (view cached: {}, listings dropped: {})",
            id, removed, listings
        );
    }

    /// Drops every cached listing. Returns the number of entries removed.
    pub fn invalidate_listings(&self) -> usize {
        self.listings.delete_by_prefix(cache_keys::LISTING_PREFIX)
    }

    /// Returns true if a view of `id` is currently cached.
    #[must_use]
    pub fn is_cached(&self, id: PersonId) -> bool {
        self.views.get(&cache_keys::entity(id)).is_some()
    }
}

impl std::fmt::Debug for ViewAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewAssembler")
            .field("views", &self.views)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
