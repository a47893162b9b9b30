//! Contact-related DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to add a contact to a person.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateContactRequest {
    #[serde(alias = "email")]
    #[validate(email(message = "Invalid email address"))]
    pub address: String,

    #[serde(default)]
    pub is_primary: bool,
}

/// Request to change a contact. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateContactRequest {
    #[serde(alias = "email")]
    #[validate(email(message = "Invalid email address"))]
    pub address: Option<String>,

    pub is_primary: Option<bool>,
}
