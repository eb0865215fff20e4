use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Sales pipeline entry. `stage` is open text with a known lifecycle
/// sequence (lead, qualified, proposal, negotiation, closed-won,
/// closed-lost); `probability` is kept within [0, 100] at write time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub value: i64,
    pub stage: String,
    pub probability: i32,
    pub expected_close: Option<NaiveDate>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
