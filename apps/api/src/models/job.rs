use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting joined with its organization, status and location names.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub org_id: Uuid,
    pub org_name: String,
    pub status_id: Option<Uuid>,
    pub status_name: Option<String>,
    pub location_id: Option<Uuid>,
    pub location_name: Option<String>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
    pub fit_rating: Option<i16>,
    pub match_percentage: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrgRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobStatusRow {
    pub id: Uuid,
    pub name: String,
}
