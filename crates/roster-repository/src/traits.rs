//! Repository trait definitions.

use async_trait::async_trait;
use roster_core::{
    Contact, ContactId, Interface, NewPerson, PageRequest, Person, PersonChanges, PersonId,
    RosterResult,
};

/// The record store behind the directory.
///
/// Every method is atomic on its own; no transaction spans two calls. The
/// symmetric relationship protocol built on [`add_edge`](Self::add_edge) and
/// [`remove_edge`](Self::remove_edge) therefore lives in the service layer.
#[async_trait]
pub trait PersonRepository: Interface + Send + Sync {
    // ============ People ============

    /// Inserts a person.
    async fn create_person(&self, person: &NewPerson) -> RosterResult<Person>;

    /// Inserts a person and its contacts in one transaction. The first
    /// address becomes the primary contact.
    async fn create_person_with_contacts(
        &self,
        person: &NewPerson,
        addresses: &[String],
    ) -> RosterResult<(Person, Vec<Contact>)>;

    /// Finds a person by ID.
    async fn find_by_id(&self, id: PersonId) -> RosterResult<Option<Person>>;

    /// Finds people by last name, ignoring case.
    async fn find_by_last_name(&self, last_name: &str) -> RosterResult<Vec<Person>>;

    /// Applies a partial update. Returns `None` if the person does not exist.
    async fn update_person(
        &self,
        id: PersonId,
        changes: &PersonChanges,
    ) -> RosterResult<Option<Person>>;

    /// Deletes a person together with its contacts and relationship rows.
    async fn delete_person(&self, id: PersonId) -> RosterResult<bool>;

    /// Lists people ordered by ID.
    async fn list(&self, page: PageRequest) -> RosterResult<Vec<Person>>;

    /// Counts all people.
    async fn count(&self) -> RosterResult<u64>;

    // ============ Contacts ============

    /// Inserts a contact for `owner`.
    async fn add_contact(
        &self,
        owner: PersonId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Contact>;

    /// Finds a contact by ID.
    async fn find_contact(&self, id: ContactId) -> RosterResult<Option<Contact>>;

    /// Replaces a contact's address and primary flag.
    async fn update_contact(
        &self,
        id: ContactId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Option<Contact>>;

    /// Deletes a contact, returning the removed row.
    async fn delete_contact(&self, id: ContactId) -> RosterResult<Option<Contact>>;

    /// Lists the contacts of `owner` ordered by ID.
    async fn list_contacts(&self, owner: PersonId) -> RosterResult<Vec<Contact>>;

    // ============ Relationships ============

    /// Inserts the directed row `from -> to`. A duplicate row is a conflict.
    async fn add_edge(&self, from: PersonId, to: PersonId) -> RosterResult<()>;

    /// Deletes the directed row `from -> to`. Returns false if it was absent.
    async fn remove_edge(&self, from: PersonId, to: PersonId) -> RosterResult<bool>;

    /// Lists the targets of every directed row leaving `from`.
    async fn list_edge_targets(&self, from: PersonId) -> RosterResult<Vec<PersonId>>;

    /// Lists the people `id` points to, ordered by ID.
    async fn list_related_people(&self, id: PersonId) -> RosterResult<Vec<Person>>;
}
