use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Nulled (not cascaded) when the referenced contact is deleted.
    pub contact_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task list row with the related contact's name joined in; `contact_name`
/// is null when no contact is linked or the contact was removed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithContact {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub contact_name: Option<String>,
}
