use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::database::models::Lead;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::{LeadFilter, LeadInput, PipelineStage};
use crate::state::AppState;

/// GET /leads?search=&stage=&limit=
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    Ok(Json(state.leads.list(user.company_id, &filter).await?))
}

/// POST /leads
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<LeadInput>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let lead = state.leads.create(user.company_id, input).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /leads/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
    Ok(Json(state.leads.get(user.company_id, id).await?))
}

/// PUT /leads/:id - full replace
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<LeadInput>,
) -> Result<Json<Lead>, ApiError> {
    Ok(Json(state.leads.update(user.company_id, id, input).await?))
}

/// DELETE /leads/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.leads.delete(user.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /leads/stats/pipeline - per-stage count, value sum, mean probability
pub async fn pipeline(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<PipelineStage>>, ApiError> {
    Ok(Json(state.leads.pipeline(user.company_id).await?))
}
