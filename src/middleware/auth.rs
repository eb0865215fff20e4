use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

/// Custom token header; checked before the standard bearer header.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated caller identity resolved by the auth gate and attached to
/// the request for downstream handlers. `company_id` scopes every query.
#[derive(Clone, Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company_id: Uuid,
    pub role: String,
}

/// Auth gate applied to every route except registration and login.
///
/// Rejects with 401 when no token is present, when verification fails, or
/// when the decoded user id no longer resolves to a stored user.
pub async fn require_auth(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user_id = auth::verify_token(&token)?;

    let user = state
        .auth
        .find_identity(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Pull the session token out of the request headers. The custom header
/// wins over `Authorization: Bearer <token>` when both are present.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTH_TOKEN_HEADER) {
        if let Ok(s) = value.to_str() {
            let s = s.trim();
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }

    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn custom_header_takes_precedence() {
        let map = headers(&[
            ("x-auth-token", "custom-token"),
            ("authorization", "Bearer bearer-token"),
        ]);
        assert_eq!(extract_token(&map).as_deref(), Some("custom-token"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let map = headers(&[("authorization", "Bearer bearer-token")]);
        assert_eq!(extract_token(&map).as_deref(), Some("bearer-token"));
    }

    #[test]
    fn missing_or_empty_token_yields_none() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
        assert_eq!(extract_token(&headers(&[("x-auth-token", "  ")])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "Bearer ")])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "Basic abc")])), None);
    }
}
