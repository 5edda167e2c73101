use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full resume row, including the uploaded bytes.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub title: String,
    pub content: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

/// Resume listing entry (no content).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

/// Stored match of a resume against a job, with the job's title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeMatchRow {
    #[serde(skip_serializing)]
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub score: i16,
    pub match_details: String,
    pub updated_at: DateTime<Utc>,
}
