use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ApiJson;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public user fields returned with a token. Registration omits
/// `companyId`; login includes it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// POST /auth/register - Create a company and its first user
///
/// 400 when the email is already registered.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::validation_error(
            "name, email and password are required",
        ));
    }

    let (token, user) = state
        .auth
        .register(
            &payload.name,
            &payload.email,
            &payload.password,
            payload.company_name,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser {
                id: user.id,
                email: user.email,
                name: user.name,
                company_id: None,
            },
        }),
    ))
}

/// POST /auth/login - Authenticate and receive a session token
///
/// Unknown email and wrong password produce the same 400 response.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (token, user) = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
            company_id: Some(user.company_id),
        },
    }))
}
