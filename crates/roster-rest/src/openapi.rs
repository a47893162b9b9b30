//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{DependencyStatus, HealthResponse, ReadinessResponse};
use roster_core::{Contact, ContactId, ErrorResponse, FieldError, Person, PersonId, PersonView};
use roster_service::{
    CreateContactRequest, CreatePersonRequest, PersonListResponse, UpdateContactRequest,
    UpdatePersonRequest,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Roster API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        version = "1.0.0",
        description = "Directory of people with their contacts and relationships",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // People
        crate::controllers::person_controller::create_person,
        crate::controllers::person_controller::list_people,
        crate::controllers::person_controller::search_by_last_name,
        crate::controllers::person_controller::get_person,
        crate::controllers::person_controller::update_person,
        crate::controllers::person_controller::delete_person,
        // Contacts
        crate::controllers::person_controller::add_contact,
        crate::controllers::contact_controller::update_contact,
        crate::controllers::contact_controller::delete_contact,
        // Relationships
        crate::controllers::friend_controller::list_friends,
        crate::controllers::friend_controller::add_friend,
        crate::controllers::friend_controller::remove_friend,
        // Health
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            PersonId,
            ContactId,
            Person,
            PersonView,
            Contact,
            ErrorResponse,
            FieldError,
            CreatePersonRequest,
            UpdatePersonRequest,
            PersonListResponse,
            CreateContactRequest,
            UpdateContactRequest,
            HealthResponse,
            ReadinessResponse,
            DependencyStatus,
        )
    ),
    tags(
        (name = "people", description = "Person endpoints"),
        (name = "contacts", description = "Contact endpoints"),
        (name = "relationships", description = "Relationship endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
