use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{self, password};
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const DEFAULT_COMPANY_NAME: &str = "My Company";

/// Registration and login. Each successful call issues a fresh session
/// token for the user it resolves.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new company (tenant) and its first user. The first user is
    /// created with the plain "user" role; there is no auto-promotion to
    /// admin in this flow.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        company_name: Option<String>,
    ) -> Result<(String, User), ApiError> {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(ApiError::conflict("Email already registered"));
        }

        let password_hash = password::hash_password(password)?;
        let company_name = company_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());

        let mut tx = self.pool.begin().await?;

        let company_id = Uuid::new_v4();
        sqlx::query("INSERT INTO companies (id, name) VALUES ($1, $2)")
            .bind(company_id)
            .bind(&company_name)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, company_id, email, password_hash, name, role)
            VALUES ($1, $2, $3, $4, $5, 'user')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            // The unique index on email backstops concurrent registrations
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::conflict("Email already registered")
            }
            _ => e.into(),
        })?;

        tx.commit().await?;

        let token = auth::issue_token(user.id)?;
        tracing::info!("Registered user {} in company {}", user.id, company_id);
        Ok((token, user))
    }

    /// Authenticate by email and password. Unknown email and wrong password
    /// collapse into one generic error so callers cannot probe which
    /// credential failed.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), ApiError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        let user = user.ok_or_else(Self::invalid_credentials)?;

        if !password::verify_password(password, &user.password_hash)? {
            return Err(Self::invalid_credentials());
        }

        sqlx::query("UPDATE users SET last_login_at = now() WHERE id = $1")
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        let token = auth::issue_token(user.id)?;
        Ok((token, user))
    }

    /// Resolve a verified token subject to a live identity, or None when
    /// the user record no longer exists.
    pub async fn find_identity(&self, user_id: Uuid) -> Result<Option<AuthUser>, ApiError> {
        let identity = sqlx::query_as::<_, AuthUser>(
            "SELECT id, email, name, company_id, role FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(identity)
    }

    fn invalid_credentials() -> ApiError {
        ApiError::bad_request("Invalid email or password")
    }
}
