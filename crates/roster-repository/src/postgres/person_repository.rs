//! PostgreSQL person repository implementation.

use crate::{traits::PersonRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roster_core::{
    Contact, ContactId, NewPerson, PageRequest, Person, PersonChanges, PersonId, RosterResult,
};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const PERSON_COLUMNS: &str = "id, first_name, last_name, middle_name, age, gender, nationality, \
                              created_at, updated_at";
const CONTACT_COLUMNS: &str = "id, owner_id, address, is_primary, created_at";

/// PostgreSQL person repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = PersonRepository)]
pub struct PgPersonRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgPersonRepository {
    /// Creates a new PostgreSQL person repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a person.
#[derive(Debug, FromRow)]
struct PersonRow {
    id: i64,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    nationality: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        Self {
            id: PersonId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            middle_name: row.middle_name,
            age: row.age,
            gender: row.gender,
            nationality: row.nationality,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row representation of a contact.
#[derive(Debug, FromRow)]
struct ContactRow {
    id: i64,
    owner_id: i64,
    address: String,
    is_primary: bool,
    created_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Self {
            id: ContactId::new(row.id),
            owner_id: PersonId::new(row.owner_id),
            address: row.address,
            is_primary: row.is_primary,
            created_at: row.created_at,
        }
    }
}

fn insert_person_sql() -> String {
    format!(
        "INSERT INTO people (first_name, last_name, middle_name, age, gender, nationality) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PERSON_COLUMNS}"
    )
}

fn insert_contact_sql() -> String {
    format!(
        "INSERT INTO contacts (owner_id, address, is_primary) VALUES ($1, $2, $3) \
         RETURNING {CONTACT_COLUMNS}"
    )
}

#[async_trait]
impl PersonRepository for PgPersonRepository {
    async fn create_person(&self, person: &NewPerson) -> RosterResult<Person> {
        debug!("Creating person: {} {}", person.first_name, person.last_name);

        let row = sqlx::query_as::<_, PersonRow>(&insert_person_sql())
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.middle_name)
            .bind(person.age)
            .bind(&person.gender)
            .bind(&person.nationality)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(row.into())
    }

    async fn create_person_with_contacts(
        &self,
        person: &NewPerson,
        addresses: &[String],
    ) -> RosterResult<(Person, Vec<Contact>)> {
        debug!(
            "Creating person with {} contacts: {} {}",
            addresses.len(),
            person.first_name,
            person.last_name
        );

        let mut tx = self.pool.inner().begin().await?;

        let person_row = sqlx::query_as::<_, PersonRow>(&insert_person_sql())
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(&person.middle_name)
            .bind(person.age)
            .bind(&person.gender)
            .bind(&person.nationality)
            .fetch_one(&mut *tx)
            .await?;

        let contact_sql = insert_contact_sql();
        let mut contacts = Vec::with_capacity(addresses.len());
        for (index, address) in addresses.iter().enumerate() {
            let row = sqlx::query_as::<_, ContactRow>(&contact_sql)
                .bind(person_row.id)
                .bind(address)
                .bind(index == 0)
                .fetch_one(&mut *tx)
                .await?;
            contacts.push(Contact::from(row));
        }

        tx.commit().await?;

        Ok((person_row.into(), contacts))
    }

    async fn find_by_id(&self, id: PersonId) -> RosterResult<Option<Person>> {
        debug!("Finding person by id: {}", id);

        let row = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Person::from))
    }

    async fn find_by_last_name(&self, last_name: &str) -> RosterResult<Vec<Person>> {
        debug!("Finding people by last name: {}", last_name);

        let rows = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE LOWER(last_name) = LOWER($1) ORDER BY id"
        ))
        .bind(last_name)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Person::from).collect())
    }

    async fn update_person(
        &self,
        id: PersonId,
        changes: &PersonChanges,
    ) -> RosterResult<Option<Person>> {
        debug!("Updating person: {}", id);

        let row = sqlx::query_as::<_, PersonRow>(&format!(
            r"
            UPDATE people SET
                first_name  = COALESCE($2, first_name),
                last_name   = COALESCE($3, last_name),
                middle_name = COALESCE($4, middle_name),
                age         = COALESCE($5, age),
                gender      = COALESCE($6, gender),
                nationality = COALESCE($7, nationality),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING {PERSON_COLUMNS}
            "
        ))
        .bind(id.into_inner())
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.middle_name)
        .bind(changes.age)
        .bind(&changes.gender)
        .bind(&changes.nationality)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Person::from))
    }

    async fn delete_person(&self, id: PersonId) -> RosterResult<bool> {
        debug!("Deleting person: {}", id);

        // contacts and relationship rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM people WHERE id = $1")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: PageRequest) -> RosterResult<Vec<Person>> {
        debug!("Listing people, limit: {}, offset: {}", page.limit, page.offset);

        let rows = sqlx::query_as::<_, PersonRow>(&format!(
            "SELECT {PERSON_COLUMNS} FROM people ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.sql_limit())
        .bind(page.sql_offset())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Person::from).collect())
    }

    async fn count(&self) -> RosterResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM people")
            .fetch_one(self.pool.inner())
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn add_contact(
        &self,
        owner: PersonId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Contact> {
        debug!("Adding contact for person {}: primary={}", owner, is_primary);

        let row = sqlx::query_as::<_, ContactRow>(&insert_contact_sql())
            .bind(owner.into_inner())
            .bind(address)
            .bind(is_primary)
            .fetch_one(self.pool.inner())
            .await?;

        Ok(row.into())
    }

    async fn find_contact(&self, id: ContactId) -> RosterResult<Option<Contact>> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn update_contact(
        &self,
        id: ContactId,
        address: &str,
        is_primary: bool,
    ) -> RosterResult<Option<Contact>> {
        debug!("Updating contact {}: primary={}", id, is_primary);

        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "UPDATE contacts SET address = $2, is_primary = $3 WHERE id = $1 \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(address)
        .bind(is_primary)
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn delete_contact(&self, id: ContactId) -> RosterResult<Option<Contact>> {
        debug!("Deleting contact: {}", id);

        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "DELETE FROM contacts WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(Contact::from))
    }

    async fn list_contacts(&self, owner: PersonId) -> RosterResult<Vec<Contact>> {
        let rows = sqlx::query_as::<_, ContactRow>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE owner_id = $1 ORDER BY id"
        ))
        .bind(owner.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Contact::from).collect())
    }

    async fn add_edge(&self, from: PersonId, to: PersonId) -> RosterResult<()> {
        debug!("Adding relationship row {} -> {}", from, to);

        sqlx::query("INSERT INTO relationships (person_id, related_id) VALUES ($1, $2)")
            .bind(from.into_inner())
            .bind(to.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }

    async fn remove_edge(&self, from: PersonId, to: PersonId) -> RosterResult<bool> {
        debug!("Removing relationship row {} -> {}", from, to);

        let result =
            sqlx::query("DELETE FROM relationships WHERE person_id = $1 AND related_id = $2")
                .bind(from.into_inner())
                .bind(to.into_inner())
                .execute(self.pool.inner())
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_edge_targets(&self, from: PersonId) -> RosterResult<Vec<PersonId>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT related_id FROM relationships WHERE person_id = $1 ORDER BY related_id",
        )
        .bind(from.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(ids.into_iter().map(PersonId::new).collect())
    }

    async fn list_related_people(&self, id: PersonId) -> RosterResult<Vec<Person>> {
        let rows = sqlx::query_as::<_, PersonRow>(
            r"
            SELECT p.id, p.first_name, p.last_name, p.middle_name, p.age, p.gender,
                   p.nationality, p.created_at, p.updated_at
            FROM people p
            JOIN relationships r ON r.related_id = p.id
            WHERE r.person_id = $1
            ORDER BY p.id
            ",
        )
        .bind(id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Person::from).collect())
    }
}
