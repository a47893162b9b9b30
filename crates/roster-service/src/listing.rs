//! Cached listings of person views.

use crate::cache::{cache_keys, CacheTtls, CachedListing, ListingCache, ServiceCaches};
use crate::view::ViewAssembler;
use futures::future::join_all;
use roster_core::{Page, PageRequest, Person, PersonView, RosterError, RosterResult};
use roster_repository::PersonRepository;
use std::sync::Arc;
use tracing::debug;

/// Caches pages and last-name searches under the `listing:` prefix.
///
/// A single mutation can move any person between pages or change the total,
/// so listings are never patched: [`ViewAssembler::invalidate_entity`] drops
/// the whole prefix instead. A listing computed across such an invalidation
/// is returned but not cached.
pub struct ListingCacheStrategy {
    repository: Arc<dyn PersonRepository>,
    assembler: Arc<ViewAssembler>,
    listings: Arc<ListingCache>,
    ttls: CacheTtls,
}

impl ListingCacheStrategy {
    pub fn new(
        repository: Arc<dyn PersonRepository>,
        assembler: Arc<ViewAssembler>,
        caches: &ServiceCaches,
        ttls: CacheTtls,
    ) -> Self {
        Self {
            repository,
            assembler,
            listings: Arc::clone(&caches.listings),
            ttls,
        }
    }

    /// Returns one page of views ordered by person id.
    pub async fn page(&self, request: PageRequest) -> RosterResult<Page<PersonView>> {
        let key = cache_keys::listing_page(request);
        if let Some(page) = self.listings.get(&key).and_then(CachedListing::into_page) {
            debug!("Listing cache hit: {}", key);
            return Ok(page);
        }

        debug!("Listing cache miss: {}", key);
        let generation = self.listings.generation();
        let (people, total) = tokio::try_join!(
            self.repository.list(request),
            self.repository.count(),
        )?;

        let views = self.views_of(people).await?;
        let page = Page::new(views, request, total);
        self.listings.set_if_current(
            key,
            CachedListing::Page(page.clone()),
            self.ttls.listing,
            generation,
        );
        Ok(page)
    }

    /// Returns the views of everyone with `last_name`, ignoring case.
    pub async fn by_last_name(&self, last_name: &str) -> RosterResult<Vec<PersonView>> {
        let last_name = last_name.trim();
        if last_name.is_empty() {
            return Err(RosterError::validation("last name must not be blank"));
        }

        let key = cache_keys::listing_by_last_name(last_name);
        if let Some(views) = self.listings.get(&key).and_then(CachedListing::into_search) {
            debug!("Listing cache hit: {}", key);
            return Ok(views);
        }

        debug!("Listing cache miss: {}", key);
        let generation = self.listings.generation();
        let people = self.repository.find_by_last_name(last_name).await?;
        let views = self.views_of(people).await?;
        self.listings.set_if_current(
            key,
            CachedListing::Search(views.clone()),
            self.ttls.search,
            generation,
        );
        Ok(views)
    }

    /// Resolves the views of `people` concurrently, keeping their order.
    ///
    /// Someone deleted between the listing query and the view lookup is left
    /// out rather than failing the whole listing.
    async fn views_of(&self, people: Vec<Person>) -> RosterResult<Vec<PersonView>> {
        let lookups = people.iter().map(|p| self.assembler.get_view(p.id));
        let mut views = Vec::with_capacity(people.len());
        for (person, result) in people.iter().zip(join_all(lookups).await) {
            match result {
                Ok(view) => views.push(view),
                Err(e) if e.is_not_found() => {
                    debug!("Person {} vanished while listing, skipping", person.id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(views)
    }
}

impl std::fmt::Debug for ListingCacheStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCacheStrategy")
            .field("listings", &self.listings)
            .field("ttls", &self.ttls)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{NewPerson, PersonId};
    use roster_repository::{FailurePoint, InMemoryPersonRepository};
    use std::time::Duration;

    struct Fixture {
        repo: Arc<InMemoryPersonRepository>,
        caches: ServiceCaches,
        assembler: Arc<ViewAssembler>,
        listing: ListingCacheStrategy,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryPersonRepository::new());
        let caches = ServiceCaches::new();
        let ttls = CacheTtls::default();
        let assembler = Arc::new(ViewAssembler::new(repo.clone(), &caches, ttls.view));
        let listing = ListingCacheStrategy::new(repo.clone(), assembler.clone(), &caches, ttls);
        Fixture {
            repo,
            caches,
            assembler,
            listing,
        }
    }

    async fn seed(repo: &InMemoryPersonRepository, names: &[(&str, &str)]) -> Vec<PersonId> {
        let mut ids = Vec::new();
        for (first, last) in names {
            ids.push(repo.create_person(&NewPerson::new(*first, *last)).await.unwrap().id);
        }
        ids
    }

    #[tokio::test]
    async fn test_page_is_cached_with_total() {
        let f = fixture();
        let ids = seed(&f.repo, &[("A", "X"), ("B", "X"), ("C", "Y")]).await;

        let page = f.listing.page(PageRequest::new(2, 0)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.iter().map(PersonView::id).collect::<Vec<_>>(), ids[..2].to_vec());
        assert!(page.has_more());

        let again = f.listing.page(PageRequest::new(2, 0)).await.unwrap();
        assert_eq!(again, page);
        assert_eq!(f.repo.list_calls(), 1);
        assert!(f.caches.listings.get("listing:limit=2:offset=0").is_some());
    }

    #[tokio::test]
    async fn test_page_warms_view_cache() {
        let f = fixture();
        let ids = seed(&f.repo, &[("A", "X")]).await;

        f.listing.page(PageRequest::first()).await.unwrap();
        assert!(f.assembler.is_cached(ids[0]));
    }

    #[tokio::test]
    async fn test_invalidation_drops_every_page() {
        let f = fixture();
        seed(&f.repo, &[("A", "X"), ("B", "X")]).await;
        f.listing.page(PageRequest::new(1, 0)).await.unwrap();
        f.listing.page(PageRequest::new(1, 1)).await.unwrap();
        f.listing.by_last_name("x").await.unwrap();
        assert_eq!(f.caches.listings.len(), 3);

        let new = f.repo.create_person(&NewPerson::new("C", "Z")).await.unwrap();
        f.assembler.invalidate_entity(new.id);
        assert!(f.caches.listings.is_empty());

        let page = f.listing.page(PageRequest::new(1, 0)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(f.repo.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_list_failure_is_not_cached() {
        let f = fixture();
        seed(&f.repo, &[("A", "X")]).await;
        f.repo.fail_on(FailurePoint::ListPeople);

        assert!(f.listing.page(PageRequest::first()).await.is_err());
        assert!(f.caches.listings.is_empty());
    }

    #[tokio::test]
    async fn test_vanished_person_is_skipped() {
        let f = fixture();
        let ids = seed(&f.repo, &[("A", "X"), ("B", "X")]).await;
        let people = vec![
            f.repo.find_by_id(ids[0]).await.unwrap().unwrap(),
            f.repo.find_by_id(ids[1]).await.unwrap().unwrap(),
        ];
        // deleted after the listing query returned its rows
        f.repo.delete_person(ids[0]).await.unwrap();

        let views = f.listing.views_of(people).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].id(), ids[1]);
    }

    #[tokio::test]
    async fn test_view_failure_fails_listing() {
        let f = fixture();
        let ids = seed(&f.repo, &[("A", "X"), ("B", "X")]).await;
        f.repo.fail_on(FailurePoint::FindPerson(ids[0]));

        assert!(f.listing.page(PageRequest::first()).await.is_err());
        assert!(f.caches.listings.is_empty());
    }

    #[tokio::test]
    async fn test_by_last_name_ignores_case_and_caches() {
        let f = fixture();
        seed(&f.repo, &[("Ada", "Lovelace"), ("Byron", "LOVELACE"), ("Alan", "Turing")]).await;

        let found = f.listing.by_last_name("lovelace").await.unwrap();
        assert_eq!(found.len(), 2);

        let cached = f.listing.by_last_name("LoveLace").await.unwrap();
        assert_eq!(cached, found);
        assert_eq!(f.caches.listings.len(), 1);
    }

    #[tokio::test]
    async fn test_by_last_name_rejects_blank() {
        let f = fixture();
        let err = f.listing.by_last_name("   ").await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_wrong_shape_under_key_is_a_miss() {
        let f = fixture();
        seed(&f.repo, &[("A", "X")]).await;
        f.caches.listings.set(
            cache_keys::listing_page(PageRequest::first()),
            CachedListing::Search(Vec::new()),
            Duration::from_secs(60),
        );

        let page = f.listing.page(PageRequest::first()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(f.repo.list_calls(), 1);
    }
}
