//! Relationship controller.
//!
//! Relationships are symmetric: relating A to B also relates B to A.

use crate::{
    extractors::parse_person_id,
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use roster_core::{ErrorResponse, Person};
use tracing::debug;

/// Creates the relationship router, nested under `/people`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:id/friends", get(list_friends))
        .route("/:id/friends/:friend_id", post(add_friend).delete(remove_friend))
}

/// List the people related to a person.
#[utoipa::path(
    get,
    path = "/people/{id}/friends",
    tag = "relationships",
    params(("id" = i64, Path, description = "Person ID")),
    responses(
        (status = 200, description = "Related people", body = Vec<Person>),
        (status = 404, description = "Person not found", body = ErrorResponse)
    )
)]
pub async fn list_friends(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Person>> {
    debug!("List friends request: {}", id);

    let id = parse_person_id(&id)?;
    let friends = state.person_service.list_friends(id).await?;
    ok(friends)
}

/// Relate two people.
#[utoipa::path(
    post,
    path = "/people/{id}/friends/{friend_id}",
    tag = "relationships",
    params(
        ("id" = i64, Path, description = "Person ID"),
        ("friend_id" = i64, Path, description = "Related person ID")
    ),
    responses(
        (status = 201, description = "Relationship created"),
        (status = 400, description = "Self-relationship", body = ErrorResponse),
        (status = 404, description = "Person not found", body = ErrorResponse),
        (status = 409, description = "Already related", body = ErrorResponse)
    )
)]
pub async fn add_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    debug!("Add friend request: {} <-> {}", id, friend_id);

    let id = parse_person_id(&id)?;
    let friend_id = parse_person_id(&friend_id)?;
    state.person_service.add_friend(id, friend_id).await?;
    Ok(StatusCode::CREATED)
}

/// Remove the relationship between two people.
#[utoipa::path(
    delete,
    path = "/people/{id}/friends/{friend_id}",
    tag = "relationships",
    params(
        ("id" = i64, Path, description = "Person ID"),
        ("friend_id" = i64, Path, description = "Related person ID")
    ),
    responses(
        (status = 204, description = "Relationship removed"),
        (status = 404, description = "Relationship not found", body = ErrorResponse)
    )
)]
pub async fn remove_friend(
    State(state): State<AppState>,
    Path((id, friend_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    debug!("Remove friend request: {} <-> {}", id, friend_id);

    let id = parse_person_id(&id)?;
    let friend_id = parse_person_id(&friend_id)?;
    state.person_service.remove_friend(id, friend_id).await?;
    Ok(no_content())
}
