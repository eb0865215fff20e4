use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{Task, TaskWithContact};
use crate::error::ApiError;
use crate::filter::{push_eq, push_limit, push_search};

/// Task list ordering: severity first (high before medium before low,
/// anything else after), then earliest due date with undated tasks last,
/// then newest first.
const TASK_LIST_ORDER: &str = " ORDER BY CASE t.priority \
     WHEN 'high' THEN 0 WHEN 'medium' THEN 1 WHEN 'low' THEN 2 ELSE 3 END, \
     t.due_date ASC NULLS LAST, t.created_at DESC";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub limit: Option<i64>,
}

/// Create/update payload. `title` is required. A supplied `contact_id`
/// must resolve to a contact in the caller's company, on update as well as
/// create.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub contact_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// One (status, priority) group of the caller's tasks.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskOverviewRow {
    pub status: String,
    pub priority: String,
    pub count: i64,
}

#[derive(Clone)]
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn list_query(company_id: Uuid, filter: &TaskFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(
            "SELECT t.*, c.name AS contact_name FROM tasks t \
             LEFT JOIN contacts c ON c.id = t.contact_id \
             WHERE t.company_id = ",
        );
        qb.push_bind(company_id);
        if let Some(term) = filter.search.as_deref() {
            push_search(&mut qb, &["t.title", "t.description"], term);
        }
        if let Some(status) = filter.status.as_deref() {
            push_eq(&mut qb, "t.status", status);
        }
        if let Some(priority) = filter.priority.as_deref() {
            push_eq(&mut qb, "t.priority", priority);
        }
        qb.push(TASK_LIST_ORDER);
        push_limit(&mut qb, filter.limit);
        qb
    }

    /// List with the related contact's name joined in; `contact_name` stays
    /// null when the task has no contact or the contact was removed.
    pub async fn list(
        &self,
        company_id: Uuid,
        filter: &TaskFilter,
    ) -> Result<Vec<TaskWithContact>, ApiError> {
        let mut qb = Self::list_query(company_id, filter);
        let tasks = qb
            .build_query_as::<TaskWithContact>()
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn get(&self, company_id: Uuid, id: Uuid) -> Result<Task, ApiError> {
        sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::not_found("Task not found"))
    }

    pub async fn create(&self, company_id: Uuid, input: TaskInput) -> Result<Task, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ApiError::validation_error("title is required"));
        }
        if let Some(contact_id) = input.contact_id {
            self.ensure_contact_in_company(company_id, contact_id).await?;
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks
                (id, company_id, contact_id, title, description, due_date,
                 priority, status)
            VALUES
                ($1, $2, $3, $4, $5, $6,
                 COALESCE($7, 'medium'), COALESCE($8, 'pending'))
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(input.contact_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(&input.priority)
        .bind(&input.status)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    /// Full-replace update; an omitted `contact_id` unlinks the contact.
    pub async fn update(
        &self,
        company_id: Uuid,
        id: Uuid,
        input: TaskInput,
    ) -> Result<Task, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ApiError::validation_error("title is required"));
        }
        if let Some(contact_id) = input.contact_id {
            self.ensure_contact_in_company(company_id, contact_id).await?;
        }

        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET
                contact_id = $3, title = $4, description = $5, due_date = $6,
                priority = COALESCE($7, 'medium'),
                status = COALESCE($8, 'pending')
            WHERE id = $1 AND company_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(input.contact_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.due_date)
        .bind(&input.priority)
        .bind(&input.status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))
    }

    pub async fn delete(&self, company_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Task not found"));
        }
        Ok(())
    }

    /// Counts of the caller's tasks grouped by (status, priority), in
    /// lexical order on both columns.
    pub async fn overview(&self, company_id: Uuid) -> Result<Vec<TaskOverviewRow>, ApiError> {
        let rows = sqlx::query_as::<_, TaskOverviewRow>(
            r#"
            SELECT status, priority, COUNT(*) AS count
            FROM tasks
            WHERE company_id = $1
            GROUP BY status, priority
            ORDER BY status, priority
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn ensure_contact_in_company(
        &self,
        company_id: Uuid,
        contact_id: Uuid,
    ) -> Result<(), ApiError> {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM contacts WHERE id = $1 AND company_id = $2")
                .bind(contact_id)
                .bind(company_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(ApiError::validation_error(
                "contactId does not reference one of your contacts",
            ));
        }
        Ok(())
    }
}
