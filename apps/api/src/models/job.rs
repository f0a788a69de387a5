use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub location: String,
    /// Natural key. Unique across the table.
    pub apply_link: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A scraped listing not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJobPosting {
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub apply_link: String,
    pub tags: Vec<String>,
}
