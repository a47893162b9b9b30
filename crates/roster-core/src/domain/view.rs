//! Composite person view.

use crate::{Contact, Person, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A person together with its contacts and relationships.
///
/// This is what callers receive and what the view cache stores. A view is
/// either fully assembled or not cached at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PersonView {
    #[serde(flatten)]
    pub person: Person,
    /// Contacts ordered by id.
    pub contacts: Vec<Contact>,
    /// Ids of related people.
    #[cfg_attr(feature = "openapi", schema(value_type = Vec<i64>))]
    pub relationships: BTreeSet<PersonId>,
}

impl PersonView {
    /// Returns the id of the viewed person.
    #[must_use]
    pub const fn id(&self) -> PersonId {
        self.person.id
    }

    /// Returns true if the viewed person is related to `other`.
    #[must_use]
    pub fn is_related_to(&self, other: PersonId) -> bool {
        self.relationships.contains(&other)
    }
}
