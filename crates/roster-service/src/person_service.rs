//! Person service trait definition.

use crate::dto::{
    CreateContactRequest, CreatePersonRequest, PersonListResponse, UpdateContactRequest,
    UpdatePersonRequest,
};
use async_trait::async_trait;
use roster_core::{Contact, ContactId, Interface, PageRequest, Person, PersonId, PersonView, RosterResult};

/// Person service trait.
#[async_trait]
pub trait PersonService: Interface + Send + Sync {
    /// Creates a new person, enriched with estimated attributes.
    async fn create_person(&self, request: CreatePersonRequest) -> RosterResult<PersonView>;

    /// Gets a person's view by ID.
    async fn get_person(&self, id: PersonId) -> RosterResult<PersonView>;

    /// Lists people with pagination.
    async fn list_people(&self, page: PageRequest) -> RosterResult<PersonListResponse>;

    /// Finds people by last name, ignoring case.
    async fn search_by_last_name(&self, last_name: &str) -> RosterResult<Vec<PersonView>>;

    /// Updates a person.
    async fn update_person(
        &self,
        id: PersonId,
        request: UpdatePersonRequest,
    ) -> RosterResult<PersonView>;

    /// Deletes a person with their contacts and relationships.
    async fn delete_person(&self, id: PersonId) -> RosterResult<()>;

    /// Adds a contact to a person.
    async fn add_contact(
        &self,
        owner: PersonId,
        request: CreateContactRequest,
    ) -> RosterResult<Contact>;

    /// Updates a contact.
    async fn update_contact(
        &self,
        id: ContactId,
        request: UpdateContactRequest,
    ) -> RosterResult<Contact>;

    /// Deletes a contact.
    async fn delete_contact(&self, id: ContactId) -> RosterResult<()>;

    /// Relates two people in both directions.
    async fn add_friend(&self, person_id: PersonId, friend_id: PersonId) -> RosterResult<()>;

    /// Removes the relationship between two people.
    async fn remove_friend(&self, person_id: PersonId, friend_id: PersonId) -> RosterResult<()>;

    /// Lists the people related to a person.
    async fn list_friends(&self, id: PersonId) -> RosterResult<Vec<Person>>;
}
