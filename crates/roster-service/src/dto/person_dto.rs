//! Person-related DTOs.

use roster_core::rules::{not_blank, valid_contact_addresses, valid_gender, valid_nationality};
use roster_core::{Page, PersonView};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new person.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePersonRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name must be 1-100 characters"),
        custom(function = "not_blank", message = "First name is required")
    )]
    pub first_name: String,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        custom(function = "not_blank", message = "Last name is required")
    )]
    pub last_name: String,

    #[validate(length(max = 100, message = "Middle name cannot exceed 100 characters"))]
    pub middle_name: Option<String>,

    /// E-mail addresses; the first one becomes the primary contact.
    #[serde(default, alias = "emails")]
    #[validate(custom(
        function = "valid_contact_addresses",
        message = "Every contact must be a valid e-mail address"
    ))]
    pub contacts: Vec<String>,
}

/// Request to update a person. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePersonRequest {
    #[validate(
        length(min = 1, max = 100, message = "First name must be 1-100 characters"),
        custom(function = "not_blank", message = "First name cannot be empty")
    )]
    pub first_name: Option<String>,

    #[validate(
        length(min = 1, max = 100, message = "Last name must be 1-100 characters"),
        custom(function = "not_blank", message = "Last name cannot be empty")
    )]
    pub last_name: Option<String>,

    #[validate(length(max = 100, message = "Middle name cannot exceed 100 characters"))]
    pub middle_name: Option<String>,

    #[validate(range(min = 1, max = 150, message = "Age must be between 1 and 150"))]
    pub age: Option<i32>,

    #[validate(custom(function = "valid_gender", message = "Gender must be 'male' or 'female'"))]
    pub gender: Option<String>,

    #[validate(custom(
        function = "valid_nationality",
        message = "Nationality must be 2 characters"
    ))]
    pub nationality: Option<String>,
}

/// A page of people with pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonListResponse {
    pub data: Vec<PersonView>,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}

impl From<Page<PersonView>> for PersonListResponse {
    fn from(page: Page<PersonView>) -> Self {
        Self {
            data: page.data,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
        }
    }
}
