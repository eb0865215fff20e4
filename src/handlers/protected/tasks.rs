use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::database::models::{Task, TaskWithContact};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::services::{TaskFilter, TaskInput, TaskOverviewRow};
use crate::state::AppState;

/// GET /tasks?search=&status=&priority=&limit=
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(filter): Query<TaskFilter>,
) -> Result<Json<Vec<TaskWithContact>>, ApiError> {
    Ok(Json(state.tasks.list(user.company_id, &filter).await?))
}

/// POST /tasks
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(input): ApiJson<TaskInput>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.tasks.create(user.company_id, input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /tasks/:id
pub async fn get_one(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.get(user.company_id, id).await?))
}

/// PUT /tasks/:id - full replace
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<TaskInput>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.tasks.update(user.company_id, id, input).await?))
}

/// DELETE /tasks/:id
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tasks.delete(user.company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /tasks/stats/overview - counts grouped by (status, priority)
pub async fn overview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<TaskOverviewRow>>, ApiError> {
    Ok(Json(state.tasks.overview(user.company_id).await?))
}
