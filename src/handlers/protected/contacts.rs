use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::database::models::Contact;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::{ContactFilter, ContactInput};
use crate::state::AppState;

/// GET /contacts?search=&status=&limit=
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    Ok(Json(state.contacts.list(user.company_id, &filter).await?))
}

/// POST /contacts
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<ContactInput>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = state.contacts.create(user.company_id, input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /contacts/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.contacts.get(user.company_id, id).await?))
}

/// PUT /contacts/:id - full replace
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<ContactInput>,
) -> Result<Json<Contact>, ApiError> {
    Ok(Json(state.contacts.update(user.company_id, id, input).await?))
}

/// DELETE /contacts/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.contacts.delete(user.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
