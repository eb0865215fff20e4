use axum::{Extension, Json};

use crate::middleware::auth::AuthUser;

/// GET /auth/me - Echo the identity the auth gate resolved; no extra lookup.
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}
