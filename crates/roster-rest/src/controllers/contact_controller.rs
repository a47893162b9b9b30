//! Contact controller.

use crate::{
    extractors::{parse_contact_id, ValidatedJson},
    responses::{no_content, ok, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::put,
    Router,
};
use roster_core::{Contact, ErrorResponse};
use roster_service::UpdateContactRequest;
use tracing::debug;

/// Creates the contact router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:contact_id", put(update_contact).delete(delete_contact))
}

/// Update a contact's address or primary flag.
#[utoipa::path(
    put,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    request_body = UpdateContactRequest,
    responses(
        (status = 200, description = "Contact updated", body = Contact),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    )
)]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateContactRequest>,
) -> ApiResult<Contact> {
    debug!("Update contact request: {}", contact_id);

    let id = parse_contact_id(&contact_id)?;
    let contact = state.person_service.update_contact(id, request).await?;
    ok(contact)
}

/// Delete a contact.
#[utoipa::path(
    delete,
    path = "/contacts/{contact_id}",
    tag = "contacts",
    params(("contact_id" = i64, Path, description = "Contact ID")),
    responses(
        (status = 204, description = "Contact deleted"),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    )
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<StatusCode, AppError> {
    debug!("Delete contact request: {}", contact_id);

    let id = parse_contact_id(&contact_id)?;
    state.person_service.delete_contact(id).await?;
    Ok(no_content())
}
