//! Path parameter parsing.

use crate::responses::AppError;
use roster_core::{ContactId, PersonId, RosterError};

/// Parses a person id from a path segment.
pub fn parse_person_id(id: &str) -> Result<PersonId, AppError> {
    id.parse()
        .map_err(|_| AppError(RosterError::Validation(format!("Invalid person ID: {}", id))))
}

/// Parses a contact id from a path segment.
pub fn parse_contact_id(id: &str) -> Result<ContactId, AppError> {
    id.parse()
        .map_err(|_| AppError(RosterError::Validation(format!("Invalid contact ID: {}", id))))
}
