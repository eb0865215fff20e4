use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::Lead;
use crate::error::ApiError;
use crate::filter::{push_eq, push_limit, push_search};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadFilter {
    pub search: Option<String>,
    pub stage: Option<String>,
    pub limit: Option<i64>,
}

/// Create/update payload. `title` is required; `probability` is clamped to
/// [0, 100] before it reaches the database.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadInput {
    pub title: String,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub value: Option<i64>,
    pub stage: Option<String>,
    pub probability: Option<i32>,
    pub expected_close: Option<NaiveDate>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// One pipeline rollup group, per stage.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStage {
    pub stage: String,
    pub count: i64,
    pub total_value: i64,
    pub avg_probability: f64,
}

#[derive(Clone)]
pub struct LeadService {
    pool: PgPool,
}

impl LeadService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn list_query(company_id: Uuid, filter: &LeadFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT * FROM leads WHERE company_id = ");
        qb.push_bind(company_id);
        if let Some(term) = filter.search.as_deref() {
            push_search(&mut qb, &["title", "company_name", "contact_name"], term);
        }
        if let Some(stage) = filter.stage.as_deref() {
            push_eq(&mut qb, "stage", stage);
        }
        qb.push(" ORDER BY created_at DESC");
        push_limit(&mut qb, filter.limit);
        qb
    }

    pub async fn list(&self, company_id: Uuid, filter: &LeadFilter) -> Result<Vec<Lead>, ApiError> {
        let mut qb = Self::list_query(company_id, filter);
        let leads = qb.build_query_as::<Lead>().fetch_all(&self.pool).await?;
        Ok(leads)
    }

    pub async fn get(&self, company_id: Uuid, id: Uuid) -> Result<Lead, ApiError> {
        sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Lead not found"))
    }

    pub async fn create(&self, company_id: Uuid, input: LeadInput) -> Result<Lead, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ApiError::validation_error("title is required"));
        }

        let probability = clamp_probability(input.probability);
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads
                (id, company_id, title, company_name, contact_name, value,
                 stage, probability, expected_close, source, notes, tags)
            VALUES
                ($1, $2, $3, $4, $5, COALESCE($6, 0),
                 COALESCE($7, 'lead'), $8, $9, $10, $11,
                 COALESCE($12, ARRAY[]::text[]))
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(&input.title)
        .bind(&input.company_name)
        .bind(&input.contact_name)
        .bind(input.value)
        .bind(&input.stage)
        .bind(probability)
        .bind(input.expected_close)
        .bind(&input.source)
        .bind(&input.notes)
        .bind(&input.tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(lead)
    }

    /// Full-replace update; omitted optional fields become null or their
    /// column default.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: LeadInput,
    ) -> Result<Lead, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ApiError::validation_error("title is required"));
        }

        let probability = clamp_probability(input.probability);
        sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads SET
                title = $3, company_name = $4, contact_name = $5,
                value = COALESCE($6, 0), stage = COALESCE($7, 'lead'),
                probability = $8, expected_close = $9, source = $10,
                notes = $11, tags = COALESCE($12, ARRAY[]::text[])
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&input.title)
        .bind(&input.company_name)
        .bind(&input.contact_name)
        .bind(input.value)
        .bind(&input.stage)
        .bind(probability)
        .bind(input.expected_close)
        .bind(&input.source)
        .bind(&input.notes)
        .bind(&input.tags)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Lead not found"))
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Lead not found"));
        }
        Ok(())
    }

    /// Per-stage rollup of the caller's pipeline: count, value sum, and
    /// mean probability, in the fixed stage sequence with unknown stages
    /// last.
    pub async fn pipeline(&self, company_id: Uuid) -> Result<Vec<PipelineStage>, ApiError> {
        let rows = sqlx::query_as::<_, PipelineStage>(
            r#"
            SELECT stage,
                   COUNT(*) AS count,
                   COALESCE(SUM(value), 0)::BIGINT AS total_value,
                   COALESCE(AVG(probability), 0)::FLOAT8 AS avg_probability
            FROM leads
            WHERE company_id = $1
            GROUP BY stage
            ORDER BY CASE stage
                WHEN 'lead' THEN 0
                WHEN 'qualified' THEN 1
                WHEN 'proposal' THEN 2
                WHEN 'negotiation' THEN 3
                WHEN 'closed-won' THEN 4
                WHEN 'closed-lost' THEN 5
                ELSE 6
            END
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn clamp_probability(probability: Option<i32>) -> i32 {
    probability.unwrap_or(0).clamp(0, 100)
}
