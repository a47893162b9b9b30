//! In-memory record store for tests.
//!
//! Behaves like the PostgreSQL store (ordering, cascades, unique relationship
//! rows) and additionally lets a test force chosen operations to fail or
//! pause between the two rows of a relationship write.

use crate::traits::PersonRepository;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use roster_core::{
    Contact, ContactId, NewPerson, PageRequest, Person, PersonChanges, PersonId, RosterError,
    RosterResult,
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// An operation that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    FindPerson(PersonId),
    ListPeople,
    DeletePerson(PersonId),
    AddContact(PersonId),
    UpdateContact(ContactId),
    ListContacts(PersonId),
    AddEdge { from: PersonId, to: PersonId },
    RemoveEdge { from: PersonId, to: PersonId },
    ListEdges(PersonId),
}

/// Pauses the next relationship row write, or read, until released.
///
/// The write has already been applied when the gate is reached, so a test
/// can observe the store in between the two rows of a symmetric edge. A
/// paused read has already taken its snapshot, so a test can change the
/// store underneath a reader that is still holding the old rows.
#[derive(Debug, Default)]
pub struct EdgeGate {
    reached: Notify,
    release: Notify,
}

impl EdgeGate {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Waits until a relationship write or read has reached the gate.
    pub async fn reached(&self) {
        self.reached.notified().await;
    }

    /// Lets the paused operation return.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
struct State {
    next_person_id: i64,
    next_contact_id: i64,
    people: BTreeMap<PersonId, Person>,
    contacts: BTreeMap<ContactId, Contact>,
    edges: BTreeSet<(PersonId, PersonId)>,
}

impl State {
    fn insert_person(&mut self, new: &NewPerson) -> Person {
        self.next_person_id += 1;
        let now = Utc::now();
        let person = Person {
            id: PersonId::new(self.next_person_id),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            middle_name: new.middle_name.clone(),
            age: new.age,
            gender: new.gender.clone(),
            nationality: new.nationality.clone(),
            created_at: now,
            updated_at: now,
        };
        self.people.insert(person.id, person.clone());
        person
    }

    fn insert_contact(&mut self, owner: PersonId, address: &str, is_primary: bool) -> Contact {
        self.next_contact_id += 1;
        let contact = Contact {
            id: ContactId::new(self.next_contact_id),
            owner_id: owner,
            address: address.to_string(),
            is_primary,
            created_at: Utc::now(),
        };
        self.contacts.insert(contact.id, contact.clone());
        contact
    }
}

/// In-memory [`PersonRepository`] with fault injection.
#[derive(Default)]
pub struct InMemoryPersonRepository {
    state: Mutex<State>,
    failures: Mutex<HashSet<FailurePoint>>,
    edge_gate: Mutex<Option<Arc<EdgeGate>>>,
    edge_read_gate: Mutex<Option<Arc<EdgeGate>>>,
    find_by_id_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryPersonRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call matching `point` fail until cleared.
    pub fn fail_on(&self, point: FailurePoint) {
        self.failures.lock().insert(point);
    }

    /// Removes one injected failure.
    pub fn clear_failure(&self, point: FailurePoint) {
        self.failures.lock().remove(&point);
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.failures.lock().clear();
    }

    /// Pauses the next `add_edge` or `remove_edge` after it has been applied.
    pub fn pause_next_edge_write(&self, gate: Arc<EdgeGate>) {
        *self.edge_gate.lock() = Some(gate);
    }

    /// Pauses the next `list_edge_targets` after it has read the rows.
    pub fn pause_next_edge_read(&self, gate: Arc<EdgeGate>) {
        *self.edge_read_gate.lock() = Some(gate);
    }

    /// Returns true if the directed row `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: PersonId, to: PersonId) -> bool {
        self.state.lock().edges.contains(&(from, to))
    }

    /// Returns the number of directed relationship rows.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.state.lock().edges.len()
    }

    /// Returns the stored contacts of `owner` without going through the trait.
    #[must_use]
    pub fn contacts_of(&self, owner: PersonId) -> Vec<Contact> {
        self.state
            .lock()
            .contacts
            .values()
            .filter(|c| c.owner_id == owner)
            .cloned()
            .collect()
    }

    /// Number of `find_by_id` calls served so far.
    #[must_use]
    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    /// Number of `list` calls served so far.
    #[must_use]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn check(&self, point: FailurePoint) -> RosterResult<()> {
        if self.failures.lock().contains(&point) {
            return Err(RosterError::Database(format!("injected failure: {point:?}")));
        }
        Ok(())
    }

    async fn pass_edge_gate(&self) {
        Self::pass_gate(&self.edge_gate).await;
    }

    async fn pass_gate(slot: &Mutex<Option<Arc<EdgeGate>>>) {
        let gate = slot.lock().take();
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn create_person(&self, person: &NewPerson) -> RosterResult<Person> {
        Ok(self.state.lock().insert_person(person))
    }

    async fn create_person_with_contacts(
        &self,
        person: &NewPerson,
        addresses: &[String],
    ) -> RosterResult<(Person, Vec<Contact>)> {
        let mut state = self.state.lock();
        let person = state.insert_person(person);
        let contacts = addresses
            .iter()
            .enumerate()
            .map(|(index, address)| state.insert_contact(person.id, address, index == 0))
            .collect();
        Ok((person, contacts))
    }

    async fn find_by_id(&self, id: PersonId) -> RosterResult<Option<Person>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::FindPerson(id))?;
        Ok(self.state.lock().people.get(&id).cloned())
    }

    async fn find_by_last_name(&self, last_name: &str) -> RosterResult<Vec<Person>> {
        Ok(self
            .state
            .lock()
            .people
            .values()
            .filter(|p| p.last_name.eq_ignore_ascii_case(last_name))
            .cloned()
            .collect())
    }

    async fn update_person(
        &self,
        id: PersonId,
        changes: &PersonChanges,
    ) -> RosterResult<Option<Person>> {
        let mut state = self.state.lock();
        Ok(state.people.get_mut(&id).map(|person| {
            changes.apply_to(person);
            person.clone()
        }))
    }

    async fn delete_person(&self, id: PersonId) -> RosterResult<bool> {
        self.check(FailurePoint::DeletePerson(id))?;
        let mut state = self.state.lock();
        if state.people.remove(&id).is_none() {
            return Ok(false);
        }
        state.contacts.retain(|_, c| c.owner_id != id);
        state.edges.retain(|(from, to)| *from != id && *to != id);
        Ok(true)
    }

    async fn list(&self, page: PageRequest) -> RosterResult<Vec<Person>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailurePoint::ListPeople)?;
        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        Ok(self
            .state
            .lock()
            .people
            .values()
            .skip(offset)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> RosterResult<u64> {
        Ok(self.state.lock().people.len() as u64)
    }

    async fn add_contact(
        &self,
        owner: PersonId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Contact> {
        self.check(FailurePoint::AddContact(owner))?;
        let mut state = self.state.lock();
        if !state.people.contains_key(&owner) {
            return Err(RosterError::Database(format!(
                "foreign key violation: person {owner} does not exist"
            )));
        }
        Ok(state.insert_contact(owner, address, is_primary))
    }

    async fn find_contact(&self, id: ContactId) -> RosterResult<Option<Contact>> {
        Ok(self.state.lock().contacts.get(&id).cloned())
    }

    async fn update_contact(
        &self,
        id: ContactId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Option<Contact>> {
        self.check(FailurePoint::UpdateContact(id))?;
        let mut state = self.state.lock();
        Ok(state.contacts.get_mut(&id).map(|contact| {
            contact.address = address.to_string();
            contact.is_primary = is_primary;
            contact.clone()
        }))
    }

    async fn delete_contact(&self, id: ContactId) -> RosterResult<Option<Contact>> {
        Ok(self.state.lock().contacts.remove(&id))
    }

    async fn list_contacts(&self, owner: PersonId) -> RosterResult<Vec<Contact>> {
        self.check(FailurePoint::ListContacts(owner))?;
        Ok(self.contacts_of(owner))
    }

    async fn add_edge(&self, from: PersonId, to: PersonId) -> RosterResult<()> {
        self.check(FailurePoint::AddEdge { from, to })?;
        {
            let mut state = self.state.lock();
            if !state.people.contains_key(&from) || !state.people.contains_key(&to) {
                return Err(RosterError::Database(format!(
                    "foreign key violation: {from} -> {to}"
                )));
            }
            if !state.edges.insert((from, to)) {
                return Err(RosterError::conflict(format!(
                    "relationship row {from} -> {to} already exists"
                )));
            }
        }
        self.pass_edge_gate().await;
        Ok(())
    }

    async fn remove_edge(&self, from: PersonId, to: PersonId) -> RosterResult<bool> {
        self.check(FailurePoint::RemoveEdge { from, to })?;
        let removed = self.state.lock().edges.remove(&(from, to));
        self.pass_edge_gate().await;
        Ok(removed)
    }

    async fn list_edge_targets(&self, from: PersonId) -> RosterResult<Vec<PersonId>> {
        self.check(FailurePoint::ListEdges(from))?;
        let targets: Vec<PersonId> = self
            .state
            .lock()
            .edges
            .iter()
            .filter(|(source, _)| *source == from)
            .map(|(_, target)| *target)
            .collect();
        Self::pass_gate(&self.edge_read_gate).await;
        Ok(targets)
    }

    async fn list_related_people(&self, id: PersonId) -> RosterResult<Vec<Person>> {
        let state = self.state.lock();
        Ok(state
            .edges
            .iter()
            .filter(|(source, _)| *source == id)
            .filter_map(|(_, target)| state.people.get(target).cloned())
            .collect())
    }
}
