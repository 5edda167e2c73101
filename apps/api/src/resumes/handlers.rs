//! Axum route handlers for stored resumes.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::validation::MATCH_PERCENTAGE_RANGE;
use crate::models::resume::{ResumeMatchRow, ResumeRow, ResumeSummaryRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateResumeResponse {
    pub resume_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub id: Uuid,
    pub title: String,
    /// Uploaded file, base64-encoded.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub last_edited: DateTime<Utc>,
}

/// A resume listing entry together with its saved job matches.
#[derive(Debug, Serialize)]
pub struct ResumeListEntry {
    #[serde(flatten)]
    pub resume: ResumeSummaryRow,
    pub matches: Vec<ResumeMatchRow>,
}

#[derive(Debug, Deserialize)]
pub struct RecordMatchRequest {
    /// Share of the job's keywords found in the resume, 0 to 100.
    #[serde(default)]
    pub score: i16,
    #[serde(default)]
    pub match_details: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeTextResponse {
    pub id: Uuid,
    pub text: String,
}

/// Parsed multipart upload: a `file` part and a `title` part.
#[derive(Debug, Default)]
struct ResumeUpload {
    title: Option<String>,
    content: Option<Bytes>,
}

impl ResumeUpload {
    fn into_parts(self) -> Result<(String, Bytes), AppError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Validation("title is required".to_string()))?;
        let content = self
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AppError::Validation("file is required".to_string()))?;
        Ok((title, content))
    }
}

/// POST /api/v1/resumes (multipart: `file`, `title`)
pub async fn handle_create_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreateResumeResponse>), AppError> {
    let mut upload = ResumeUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                upload.content = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read file part: {e}"))
                })?);
            }
            Some("title") => {
                upload.title = Some(field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read title part: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let (title, content) = upload.into_parts()?;
    let resume_id = Uuid::new_v4();

    sqlx::query("INSERT INTO resumes (id, title, content) VALUES ($1, $2, $3)")
        .bind(resume_id)
        .bind(&title)
        .bind(content.as_ref())
        .execute(&state.db)
        .await?;

    info!("Stored resume {resume_id} ({title}, {} bytes)", content.len());
    Ok((StatusCode::CREATED, Json(CreateResumeResponse { resume_id })))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeListEntry>>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeSummaryRow>(
        "SELECT id, title, created_at, last_edited FROM resumes ORDER BY last_edited DESC",
    )
    .fetch_all(&state.db)
    .await?;

    let matches = sqlx::query_as::<_, ResumeMatchRow>(
        r#"
        SELECT m.resume_id, m.job_id, j.title AS job_title, m.score, m.match_details, m.updated_at
        FROM resume_job_matches m
        INNER JOIN jobs j ON m.job_id = j.id
        ORDER BY m.updated_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(attach_matches(resumes, matches)))
}

/// POST /api/v1/resumes/:id/matches/:job_id
///
/// Saves (or overwrites) the analysis result for a resume against a job.
pub async fn handle_record_match(
    State(state): State<AppState>,
    Path((resume_id, job_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<RecordMatchRequest>,
) -> Result<Json<ResumeMatchRow>, AppError> {
    validate_score(request.score)?;

    let saved = sqlx::query_as::<_, ResumeMatchRow>(
        r#"
        WITH saved AS (
            INSERT INTO resume_job_matches (resume_id, job_id, score, match_details)
            SELECT r.id, j.id, $3, $4
            FROM resumes r CROSS JOIN jobs j
            WHERE r.id = $1 AND j.id = $2
            ON CONFLICT (resume_id, job_id)
            DO UPDATE SET score = EXCLUDED.score,
                          match_details = EXCLUDED.match_details,
                          updated_at = now()
            RETURNING resume_id, job_id, score, match_details, updated_at
        )
        SELECT s.resume_id, s.job_id, j.title AS job_title, s.score, s.match_details, s.updated_at
        FROM saved s
        INNER JOIN jobs j ON s.job_id = j.id
        "#,
    )
    .bind(resume_id)
    .bind(job_id)
    .bind(request.score)
    .bind(&request.match_details)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| {
        AppError::NotFound(format!("Resume {resume_id} or job {job_id} not found"))
    })?;

    info!(
        "Recorded match of resume {resume_id} against job {job_id}: {}",
        saved.score
    );
    Ok(Json(saved))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        "SELECT id, title, content, created_at, last_edited FROM resumes WHERE id = $1",
    )
    .bind(resume_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    Ok(Json(ResumeDetailResponse {
        id: row.id,
        title: row.title,
        content: STANDARD.encode(&row.content),
        created_at: row.created_at,
        last_edited: row.last_edited,
    }))
}

/// GET /api/v1/resumes/:id/text
///
/// The text the keyword pipeline sees for this resume.
pub async fn handle_get_resume_text(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeTextResponse>, AppError> {
    let text = state.resumes.fetch(resume_id).await?;
    Ok(Json(ResumeTextResponse {
        id: resume_id,
        text,
    }))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(resume_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resumes/:id/copy
pub async fn handle_copy_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CreateResumeResponse>), AppError> {
    let new_id = Uuid::new_v4();

    let copied: Option<Uuid> = sqlx::query_scalar(
        r#"
        INSERT INTO resumes (id, title, content)
        SELECT $1, 'Copy of ' || title, content
        FROM resumes
        WHERE id = $2
        RETURNING id
        "#,
    )
    .bind(new_id)
    .bind(resume_id)
    .fetch_optional(&state.db)
    .await?;

    let resume_id =
        copied.ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    info!("Copied resume into {resume_id}");
    Ok((StatusCode::CREATED, Json(CreateResumeResponse { resume_id })))
}

fn validate_score(score: i16) -> Result<(), AppError> {
    if !MATCH_PERCENTAGE_RANGE.contains(&score) {
        return Err(AppError::Validation(format!(
            "score must be between 0 and 100, got {score}"
        )));
    }
    Ok(())
}

/// Groups matches under their resume, keeping the resume order.
fn attach_matches(
    resumes: Vec<ResumeSummaryRow>,
    matches: Vec<ResumeMatchRow>,
) -> Vec<ResumeListEntry> {
    let mut by_resume: HashMap<Uuid, Vec<ResumeMatchRow>> = HashMap::new();
    for m in matches {
        by_resume.entry(m.resume_id).or_default().push(m);
    }

    resumes
        .into_iter()
        .map(|resume| ResumeListEntry {
            matches: by_resume.remove(&resume.id).unwrap_or_default(),
            resume,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(title: &str) -> ResumeSummaryRow {
        ResumeSummaryRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            created_at: Utc::now(),
            last_edited: Utc::now(),
        }
    }

    fn saved_match(resume_id: Uuid, job_title: &str, score: i16) -> ResumeMatchRow {
        ResumeMatchRow {
            resume_id,
            job_id: Uuid::new_v4(),
            job_title: job_title.to_string(),
            score,
            match_details: String::new(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_are_grouped_under_their_resume() {
        let product = summary("Product CV");
        let data = summary("Data CV");
        let matches = vec![
            saved_match(data.id, "Data Engineer", 80),
            saved_match(product.id, "Senior PM", 65),
            saved_match(data.id, "Analytics Lead", 40),
        ];
        let (product_id, data_id) = (product.id, data.id);

        let entries = attach_matches(vec![product, data, summary("Blank CV")], matches);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].resume.id, product_id);
        assert_eq!(entries[0].matches.len(), 1);
        assert_eq!(entries[0].matches[0].job_title, "Senior PM");
        assert_eq!(entries[1].resume.id, data_id);
        let titles: Vec<_> = entries[1].matches.iter().map(|m| m.job_title.as_str()).collect();
        assert_eq!(titles, vec!["Data Engineer", "Analytics Lead"]);
        assert!(entries[2].matches.is_empty());
    }

    #[test]
    fn test_list_entry_serializes_flat_with_matches() {
        let resume = summary("Product CV");
        let resume_id = resume.id;
        let entry = ResumeListEntry {
            matches: vec![saved_match(resume_id, "Senior PM", 72)],
            resume,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], serde_json::json!(resume_id));
        assert_eq!(value["title"], "Product CV");
        assert_eq!(value["matches"][0]["job_title"], "Senior PM");
        assert_eq!(value["matches"][0]["score"], 72);
        assert!(value["matches"][0].get("resume_id").is_none());
    }

    #[test]
    fn test_record_match_request_defaults() {
        let request: RecordMatchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.score, 0);
        assert!(request.match_details.is_empty());
    }

    #[test]
    fn test_score_range() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(100).is_ok());
        assert!(validate_score(-1).is_err());
        assert!(validate_score(101).is_err());
    }

    #[test]
    fn test_upload_requires_title() {
        let upload = ResumeUpload {
            title: Some("   ".to_string()),
            content: Some(Bytes::from_static(b"resume")),
        };
        assert!(matches!(
            upload.into_parts(),
            Err(AppError::Validation(ref m)) if m == "title is required"
        ));
    }

    #[test]
    fn test_upload_requires_non_empty_file() {
        let upload = ResumeUpload {
            title: Some("Product CV".to_string()),
            content: Some(Bytes::new()),
        };
        assert!(matches!(
            upload.into_parts(),
            Err(AppError::Validation(ref m)) if m == "file is required"
        ));
    }

    #[test]
    fn test_upload_parts_are_trimmed() {
        let upload = ResumeUpload {
            title: Some("  Product CV ".to_string()),
            content: Some(Bytes::from_static(b"Jane Doe")),
        };
        let (title, content) = upload.into_parts().unwrap();
        assert_eq!(title, "Product CV");
        assert_eq!(content.as_ref(), b"Jane Doe");
    }
}
