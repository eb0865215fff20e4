use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::Contact;
use crate::error::ApiError;
use crate::filter::{push_eq, push_limit, push_search};

/// Optional list constraints, straight from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

/// Create/update payload. `name` is the one required field; everything else
/// is optional and, on update, overwrites the stored column as given.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub company_name: Option<String>,
    pub status: Option<String>,
    pub value: Option<i64>,
    pub notes: Option<String>,
    pub last_contact: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone)]
pub struct ContactService {
    pool: PgPool,
}

impl ContactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn list_query(company_id: Uuid, filter: &ContactFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT * FROM contacts WHERE company_id = ");
        qb.push_bind(company_id);
        if let Some(term) = filter.search.as_deref() {
            push_search(&mut qb, &["name", "email", "company_name"], term);
        }
        if let Some(status) = filter.status.as_deref() {
            push_eq(&mut qb, "status", status);
        }
        qb.push(" ORDER BY created_at DESC");
        push_limit(&mut qb, filter.limit);
        qb
    }

    pub async fn list(
        &self,
        company_id: Uuid,
        filter: &ContactFilter,
    ) -> Result<Vec<Contact>, ApiError> {
        let mut qb = Self::list_query(company_id, filter);
        let contacts = qb
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;
        Ok(contacts)
    }

    pub async fn get(&self, company_id: Uuid, id: Uuid) -> Result<Contact, ApiError> {
        sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Contact not found"))
    }

    /// Creation stamps `last_contact` with the current date.
    pub async fn create(&self, company_id: Uuid, input: ContactInput) -> Result<Contact, ApiError> {
        if input.name.trim().is_empty() {
            return Err(ApiError::validation_error("name is required"));
        }

        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts
                (id, company_id, name, email, phone, position, company_name,
                 status, value, notes, last_contact, tags)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7,
                 COALESCE($8, 'prospect'), COALESCE($9, 0), $10, CURRENT_DATE,
                 COALESCE($11, ARRAY[]::text[]))
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.position)
        .bind(&input.company_name)
        .bind(&input.status)
        .bind(input.value)
        .bind(&input.notes)
        .bind(&input.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(contact)
    }

    /// Full-replace update: every mutable column is overwritten from the
    /// payload; omitted optional fields become null (or their column
    /// default for status/value/tags).
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: ContactInput,
    ) -> Result<Contact, ApiError> {
        if input.name.trim().is_empty() {
            return Err(ApiError::validation_error("name is required"));
        }

        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts SET
                name = $3, email = $4, phone = $5, position = $6,
                company_name = $7, status = COALESCE($8, 'prospect'),
                value = COALESCE($9, 0), notes = $10, last_contact = $11,
                tags = COALESCE($12, ARRAY[]::text[])
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.position)
        .bind(&input.company_name)
        .bind(&input.status)
        .bind(input.value)
        .bind(&input.notes)
        .bind(input.last_contact)
        .bind(&input.tags)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Contact not found"))
    }

    /// Hard delete. Tasks referencing the contact keep their row; the FK
    /// nulls their contact_id.
    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Contact not found"));
        }
        Ok(())
    }
}
