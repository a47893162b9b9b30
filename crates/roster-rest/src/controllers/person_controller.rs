//! Person controller.

use crate::{
    extractors::{parse_person_id, PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResult, AppError, CreatedResult},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use roster_core::{Contact, ErrorResponse, PersonView};
use roster_service::{
    CreateContactRequest, CreatePersonRequest, PersonListResponse, UpdatePersonRequest,
};
use tracing::debug;

/// Creates the person router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_people).post(create_person))
        .route("/lastname/:last_name", get(search_by_last_name))
        .route(
            "/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
        .route("/:id/contacts", post(add_contact))
}

/// Create a person.
///
/// Age, gender and nationality are estimated from the first name when
/// enrichment is enabled.
#[utoipa::path(
    post,
    path = "/people",
    tag = "people",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Person created", body = PersonView),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_person(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePersonRequest>,
) -> CreatedResult<PersonView> {
    debug!("Create person request: {} {}", request.first_name, request.last_name);

    let view = state.person_service.create_person(request).await?;
    Ok(created(view))
}

/// List people.
#[utoipa::path(
    get,
    path = "/people",
    tag = "people",
    params(PaginationQuery),
    responses(
        (status = 200, description = "A page of people", body = PersonListResponse)
    )
)]
pub async fn list_people(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<PersonListResponse> {
    debug!("List people request: {:?}", pagination);

    let response = state.person_service.list_people(pagination.into()).await?;
    ok(response)
}

/// Find people by last name, ignoring case.
#[utoipa::path(
    get,
    path = "/people/lastname/{last_name}",
    tag = "people",
    params(("last_name" = String, Path, description = "Last name to match")),
    responses(
        (status = 200, description = "Matching people", body = Vec<PersonView>),
        (status = 400, description = "Blank last name", body = ErrorResponse)
    )
)]
pub async fn search_by_last_name(
    State(state): State<AppState>,
    Path(last_name): Path<String>,
) -> ApiResult<Vec<PersonView>> {
    debug!("Search by last name request: {}", last_name);

    let people = state.person_service.search_by_last_name(&last_name).await?;
    ok(people)
}

/// Get a person with their contacts and relationships.
#[utoipa::path(
    get,
    path = "/people/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Person ID")),
    responses(
        (status = 200, description = "The person", body = PersonView),
        (status = 404, description = "Person not found", body = ErrorResponse)
    )
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PersonView> {
    debug!("Get person request: {}", id);

    let id = parse_person_id(&id)?;
    let view = state.person_service.get_person(id).await?;
    ok(view)
}

/// Update a person.
#[utoipa::path(
    put,
    path = "/people/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Person ID")),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Person updated", body = PersonView),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    )
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdatePersonRequest>,
) -> ApiResult<PersonView> {
    debug!("Update person request: {}", id);

    let id = parse_person_id(&id)?;
    let view = state.person_service.update_person(id, request).await?;
    ok(view)
}

/// Delete a person with their contacts and relationships.
#[utoipa::path(
    delete,
    path = "/people/{id}",
    tag = "people",
    params(("id" = i64, Path, description = "Person ID")),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 404, description = "Person not found", body = ErrorResponse)
    )
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete person request: {}", id);

    let id = parse_person_id(&id)?;
    state.person_service.delete_person(id).await?;
    Ok(no_content())
}

/// Add a contact to a person.
///
/// A primary contact demotes the person's other contacts.
#[utoipa::path(
    post,
    path = "/people/{id}/contacts",
    tag = "contacts",
    params(("id" = i64, Path, description = "Owner person ID")),
    request_body = CreateContactRequest,
    responses(
        (status = 201, description = "Contact created", body = Contact),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse)
    )
)]
pub async fn add_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<CreateContactRequest>,
) -> CreatedResult<Contact> {
    debug!("Add contact request: person {}", id);

    let owner = parse_person_id(&id)?;
    let contact = state.person_service.add_contact(owner, request).await?;
    Ok(created(contact))
}
