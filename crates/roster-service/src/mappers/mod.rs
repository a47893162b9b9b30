//! DTO-to-domain mappers.

use crate::dto::{CreatePersonRequest, UpdatePersonRequest};
use crate::enrichment::Enrichment;
use roster_core::{NewPerson, PersonChanges};

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

impl From<&CreatePersonRequest> for NewPerson {
    fn from(request: &CreatePersonRequest) -> Self {
        Self {
            first_name: trimmed(&request.first_name),
            last_name: trimmed(&request.last_name),
            middle_name: request
                .middle_name
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            ..Self::default()
        }
    }
}

impl From<UpdatePersonRequest> for PersonChanges {
    fn from(request: UpdatePersonRequest) -> Self {
        Self {
            first_name: request.first_name.as_deref().map(trimmed),
            last_name: request.last_name.as_deref().map(trimmed),
            middle_name: request.middle_name.as_deref().map(trimmed),
            age: request.age,
            gender: request.gender,
            nationality: request.nationality,
        }
    }
}

/// Fills the attributes of `person` that enrichment found.
pub fn apply_enrichment(person: &mut NewPerson, enrichment: Enrichment) {
    person.age = enrichment.age;
    person.gender = enrichment.gender;
    person.nationality = enrichment.nationality;
}
