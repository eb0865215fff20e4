use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

pub mod password;

/// Claims embedded in a session token. `sub` is the user id; expiry defaults
/// to 7 days from issuance (JWT_EXPIRY_DAYS via config).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        let expiry_days = config::config().security.jwt_expiry_days;
        Self {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::days(expiry_days)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// Issue a signed session token for the given user.
pub fn issue_token(user_id: Uuid) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    let claims = Claims::new(user_id);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Verify a session token and return the embedded user id.
/// Fails on malformed tokens, signature mismatch, and expiry.
pub fn verify_token(token: &str) -> Result<Uuid, JwtError> {
    let secret = &config::config().security.jwt_secret;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| JwtError::InvalidToken)?;

    Ok(token_data.claims.sub)
}
