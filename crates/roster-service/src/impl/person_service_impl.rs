//! Person service implementation.

use crate::cache::{CacheTtls, ServiceCaches};
use crate::dto::{
    CreateContactRequest, CreatePersonRequest, PersonListResponse, UpdateContactRequest,
    UpdatePersonRequest,
};
use crate::enrichment::Enricher;
use crate::listing::ListingCacheStrategy;
use crate::mappers::apply_enrichment;
use crate::orchestrator::RelationshipOrchestrator;
use crate::person_service::PersonService;
use crate::view::ViewAssembler;
use async_trait::async_trait;
use roster_core::{
    Contact, ContactId, NewPerson, PageRequest, Person, PersonChanges, PersonId, PersonView,
    RosterError, RosterResult, ValidateExt,
};
use roster_repository::PersonRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Person service built from the view assembler, the listing cache and the
/// relationship orchestrator, all sharing one set of caches.
pub struct PersonServiceImpl {
    repository: Arc<dyn PersonRepository>,
    enricher: Arc<dyn Enricher>,
    assembler: Arc<ViewAssembler>,
    listing: ListingCacheStrategy,
    orchestrator: RelationshipOrchestrator,
}

impl PersonServiceImpl {
    /// Creates a new person service.
    pub fn new(
        repository: Arc<dyn PersonRepository>,
        enricher: Arc<dyn Enricher>,
        caches: &ServiceCaches,
        ttls: CacheTtls,
    ) -> Self {
        let assembler = Arc::new(ViewAssembler::new(repository.clone(), caches, ttls.view));
        let listing =
            ListingCacheStrategy::new(repository.clone(), assembler.clone(), caches, ttls);
        let orchestrator = RelationshipOrchestrator::new(repository.clone(), assembler.clone());

        Self {
            repository,
            enricher,
            assembler,
            listing,
            orchestrator,
        }
    }

    async fn require_person(&self, id: PersonId) -> RosterResult<Person> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| RosterError::not_found("Person", id))
    }
}

#[async_trait]
impl PersonService for PersonServiceImpl {
    async fn create_person(&self, request: CreatePersonRequest) -> RosterResult<PersonView> {
        debug!("Creating person: {} {}", request.first_name, request.last_name);

        request.validate_request()?;

        let mut person = NewPerson::from(&request);
        let enrichment = self.enricher.enrich(&person.first_name).await;
        apply_enrichment(&mut person, enrichment);

        let created = if request.contacts.is_empty() {
            self.repository.create_person(&person).await?
        } else {
            let addresses: Vec<String> =
                request.contacts.iter().map(|a| a.trim().to_string()).collect();
            self.repository
                .create_person_with_contacts(&person, &addresses)
                .await?
                .0
        };

        self.assembler.invalidate_entity(created.id);
        info!("Person created: {}", created.id);
        self.assembler.get_view(created.id).await
    }

    async fn get_person(&self, id: PersonId) -> RosterResult<PersonView> {
        debug!("Getting person: {}", id);
        self.assembler.get_view(id).await
    }

    async fn list_people(&self, page: PageRequest) -> RosterResult<PersonListResponse> {
        debug!("Listing people, limit: {}, offset: {}", page.limit, page.offset);
        let page = self.listing.page(page).await?;
        Ok(PersonListResponse::from(page))
    }

    async fn search_by_last_name(&self, last_name: &str) -> RosterResult<Vec<PersonView>> {
        debug!("Searching people by last name: {}", last_name);
        self.listing.by_last_name(last_name).await
    }

    async fn update_person(
        &self,
        id: PersonId,
        request: UpdatePersonRequest,
    ) -> RosterResult<PersonView> {
        debug!("Updating person: {}", id);

        request.validate_request()?;

        let changes = PersonChanges::from(request);
        if changes.is_empty() {
            return Err(RosterError::validation("no fields to update"));
        }

        self.repository
            .update_person(id, &changes)
            .await?
            .ok_or_else(|| RosterError::not_found("Person", id))?;

        self.assembler.invalidate_entity(id);
        info!("Person updated: {}", id);
        self.assembler.get_view(id).await
    }

    async fn delete_person(&self, id: PersonId) -> RosterResult<()> {
        debug!("Deleting person: {}", id);

        // the cascade also changes the relationship sets of these people
        let related = self.repository.list_edge_targets(id).await?;

        if !self.repository.delete_person(id).await? {
            return Err(RosterError::not_found("Person", id));
        }

        self.assembler.invalidate_entity(id);
        for other in related {
            self.assembler.invalidate_entity(other);
        }

        info!("Person deleted: {}", id);
        Ok(())
    }

    async fn add_contact(
        &self,
        owner: PersonId,
        request: CreateContactRequest,
    ) -> RosterResult<Contact> {
        request.validate_request()?;
        self.orchestrator
            .add_contact(owner, request.address.trim(), request.is_primary)
            .await
    }

    async fn update_contact(
        &self,
        id: ContactId,
        request: UpdateContactRequest,
    ) -> RosterResult<Contact> {
        request.validate_request()?;
        if request.address.is_none() && request.is_primary.is_none() {
            return Err(RosterError::validation("no fields to update"));
        }

        let address = request.address.map(|a| a.trim().to_string());
        self.orchestrator
            .update_contact(id, address, request.is_primary)
            .await
    }

    async fn delete_contact(&self, id: ContactId) -> RosterResult<()> {
        self.orchestrator.delete_contact(id).await.map(|_| ())
    }

    async fn add_friend(&self, person_id: PersonId, friend_id: PersonId) -> RosterResult<()> {
        self.orchestrator.add_relationship(person_id, friend_id).await
    }

    async fn remove_friend(&self, person_id: PersonId, friend_id: PersonId) -> RosterResult<()> {
        self.orchestrator
            .remove_relationship(person_id, friend_id)
            .await
    }

    async fn list_friends(&self, id: PersonId) -> RosterResult<Vec<Person>> {
        debug!("Listing friends of person: {}", id);
        self.require_person(id).await?;
        self.repository.list_related_people(id).await
    }
}

impl std::fmt::Debug for PersonServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonServiceImpl")
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::cache_keys;
    use crate::enrichment::{Enrichment, NoopEnricher};
    use roster_repository::{FailurePoint, InMemoryPersonRepository};

    struct FixedEnricher(Enrichment);

    #[async_trait]
    impl Enricher for FixedEnricher {
        async fn enrich(&self, _first_name: &str) -> Enrichment {
            self.0.clone()
        }
    }

    struct Fixture {
        repo: Arc<InMemoryPersonRepository>,
        caches: ServiceCaches,
        service: PersonServiceImpl,
    }

    fn fixture_with(enricher: Arc<dyn Enricher>) -> Fixture {
        let repo = Arc::new(InMemoryPersonRepository::new());
        let caches = ServiceCaches::new();
        let service =
            PersonServiceImpl::new(repo.clone(), enricher, &caches, CacheTtls::default());
        Fixture {
            repo,
            caches,
            service,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(NoopEnricher))
    }

    fn create_request(first: &str, last: &str) -> CreatePersonRequest {
        CreatePersonRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            middle_name: None,
            contacts: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_person_with_contacts() {
        let f = fixture();
        let mut request = create_request(" Grace ", "Hopper");
        request.contacts = vec!["grace@example.com".to_string(), "gh@example.com".to_string()];

        let view = f.service.create_person(request).await.unwrap();
        assert_eq!(view.person.first_name, "Grace");
        assert_eq!(view.contacts.len(), 2);
        assert!(view.contacts[0].is_primary);
        assert!(!view.contacts[1].is_primary);
    }

    #[tokio::test]
    async fn test_create_person_applies_enrichment() {
        let f = fixture_with(Arc::new(FixedEnricher(Enrichment {
            age: Some(36),
            gender: Some("female".to_string()),
            nationality: None,
        })));

        let view = f.service.create_person(create_request("Ada", "Lovelace")).await.unwrap();
        assert_eq!(view.person.age, Some(36));
        assert_eq!(view.person.gender.as_deref(), Some("female"));
        assert!(view.person.nationality.is_none());
    }

    #[tokio::test]
    async fn test_create_person_rejects_invalid_request() {
        let f = fixture();
        let err = f.service.create_person(create_request("", "Lovelace")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(f.repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_person_clears_listings() {
        let f = fixture();
        f.service.create_person(create_request("Ada", "Lovelace")).await.unwrap();
        let before = f.service.list_people(PageRequest::first()).await.unwrap();
        assert_eq!(before.total, 1);

        f.service.create_person(create_request("Alan", "Turing")).await.unwrap();
        let after = f.service.list_people(PageRequest::first()).await.unwrap();
        assert_eq!(after.total, 2);
    }

    #[tokio::test]
    async fn test_update_person_with_no_fields() {
        let f = fixture();
        let view = f.service.create_person(create_request("Ada", "Lovelace")).await.unwrap();

        let err = f
            .service
            .update_person(view.id(), UpdatePersonRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RosterError::Validation(ref m) if m == "no fields to update"));
    }

    #[tokio::test]
    async fn test_update_missing_person() {
        let f = fixture();
        let request = UpdatePersonRequest {
            age: Some(30),
            ..UpdatePersonRequest::default()
        };
        let err = f.service.update_person(PersonId::new(5), request).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_person_invalidates_related_views() {
        let f = fixture();
        let a = f.service.create_person(create_request("A", "Test")).await.unwrap().id();
        let b = f.service.create_person(create_request("B", "Test")).await.unwrap().id();
        f.service.add_friend(a, b).await.unwrap();
        assert!(f.service.get_person(b).await.unwrap().is_related_to(a));

        f.service.delete_person(a).await.unwrap();

        assert!(f.caches.views.get(&cache_keys::entity(b)).is_none());
        assert!(!f.service.get_person(b).await.unwrap().is_related_to(a));
        assert!(f.service.get_person(a).await.unwrap_err().is_not_found());
        assert!(f.service.delete_person(a).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete_person_store_failure() {
        let f = fixture();
        let a = f.service.create_person(create_request("A", "Test")).await.unwrap().id();
        f.repo.fail_on(FailurePoint::DeletePerson(a));

        assert_eq!(f.service.delete_person(a).await.unwrap_err().status_code(), 500);
        assert!(f.service.get_person(a).await.is_ok());
    }

    #[tokio::test]
    async fn test_contact_operations_refresh_view() {
        let f = fixture();
        let a = f.service.create_person(create_request("A", "Test")).await.unwrap().id();

        let contact = f
            .service
            .add_contact(
                a,
                CreateContactRequest {
                    address: "a@example.com".to_string(),
                    is_primary: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(f.service.get_person(a).await.unwrap().contacts, vec![contact.clone()]);

        f.service
            .update_contact(
                contact.id,
                UpdateContactRequest {
                    address: Some("b@example.com".to_string()),
                    is_primary: None,
                },
            )
            .await
            .unwrap();
        let view = f.service.get_person(a).await.unwrap();
        assert_eq!(view.contacts[0].address, "b@example.com");

        f.service.delete_contact(contact.id).await.unwrap();
        assert!(f.service.get_person(a).await.unwrap().contacts.is_empty());
    }

    #[tokio::test]
    async fn test_add_contact_rejects_bad_address() {
        let f = fixture();
        let a = f.service.create_person(create_request("A", "Test")).await.unwrap().id();
        let err = f
            .service
            .add_contact(
                a,
                CreateContactRequest {
                    address: "nope".to_string(),
                    is_primary: false,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_update_contact_requires_a_field() {
        let f = fixture();
        let err = f
            .service
            .update_contact(ContactId::new(1), UpdateContactRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_list_friends() {
        let f = fixture();
        let a = f.service.create_person(create_request("A", "Test")).await.unwrap().id();
        let b = f.service.create_person(create_request("B", "Test")).await.unwrap().id();
        let c = f.service.create_person(create_request("C", "Test")).await.unwrap().id();
        f.service.add_friend(a, b).await.unwrap();
        f.service.add_friend(c, a).await.unwrap();

        let friends: Vec<PersonId> = f
            .service
            .list_friends(a)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(friends, vec![b, c]);

        let err = f.service.list_friends(PersonId::new(99)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_search_by_last_name() {
        let f = fixture();
        f.service.create_person(create_request("Ada", "Lovelace")).await.unwrap();
        f.service.create_person(create_request("Alan", "Turing")).await.unwrap();

        let found = f.service.search_by_last_name("LOVELACE").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].person.first_name, "Ada");
    }
}
