//! Contact entity.

use crate::{ContactId, PersonId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An e-mail contact owned by a person.
///
/// At most one contact per owner carries `is_primary = true`; the service
/// layer keeps it that way, the store does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Contact {
    pub id: ContactId,
    pub owner_id: PersonId,
    pub address: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// Returns the primary contact in a list, if any.
#[must_use]
pub fn primary_contact(contacts: &[Contact]) -> Option<&Contact> {
    contacts.iter().find(|c| c.is_primary)
}
