//! Person entity.

use crate::PersonId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Person {
    /// Unique identifier for the person.
    pub id: PersonId,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Optional middle name.
    pub middle_name: Option<String>,

    /// Age, usually estimated from the first name.
    pub age: Option<i32>,

    /// Gender, `male` or `female`.
    pub gender: Option<String>,

    /// Two-letter nationality code.
    pub nationality: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Person {
    /// Returns the person's full name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// The insertable fields of a person.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl NewPerson {
    /// Creates a new person with just the required names.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }
}

/// A partial update of a person; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub nationality: Option<String>,
}

impl PersonChanges {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.middle_name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.nationality.is_none()
    }

    /// Applies the changes to a person in place.
    pub fn apply_to(&self, person: &mut Person) {
        if let Some(first_name) = &self.first_name {
            person.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            person.last_name.clone_from(last_name);
        }
        if let Some(middle_name) = &self.middle_name {
            person.middle_name = Some(middle_name.clone());
        }
        if let Some(age) = self.age {
            person.age = Some(age);
        }
        if let Some(gender) = &self.gender {
            person.gender = Some(gender.clone());
        }
        if let Some(nationality) = &self.nationality {
            person.nationality = Some(nationality.clone());
        }
        person.updated_at = Utc::now();
    }
}
