use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::queries::{
    delete_job, get_job, insert_job, job_statistics, list_jobs, list_locations, list_orgs,
    list_statuses, update_job, upsert_org, JobFilter, JobStatistics, JobUpdate, NewJob,
};
use crate::jobs::validation::{
    require_text, validate_fit_rating, validate_match_percentage, validate_salary_range,
};
use crate::models::job::{JobRow, JobStatusRow, LocationRow, OrgRow};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Deserialize)]
pub struct NewOrg {
    pub name: String,
}

#[derive(Serialize)]
pub struct ReferenceData {
    pub organizations: Vec<OrgRow>,
    pub locations: Vec<LocationRow>,
    pub statuses: Vec<JobStatusRow>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(job): Json<NewJob>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    validate_new_job(&job)?;
    let id = insert_job(&state.db, &job).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(list_jobs(&state.db, &filter).await?))
}

/// GET /api/v1/jobs/statistics
pub async fn handle_job_statistics(
    State(state): State<AppState>,
) -> Result<Json<JobStatistics>, AppError> {
    Ok(Json(job_statistics(&state.db).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Json(job))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(update): Json<JobUpdate>,
) -> Result<StatusCode, AppError> {
    validate_job_update(&update)?;
    if update_job(&state.db, job_id, &update).await? == 0 {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if delete_job(&state.db, job_id).await? == 0 {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/orgs
pub async fn handle_list_orgs(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrgRow>>, AppError> {
    Ok(Json(list_orgs(&state.db).await?))
}

/// POST /api/v1/orgs
pub async fn handle_create_org(
    State(state): State<AppState>,
    Json(org): Json<NewOrg>,
) -> Result<Json<CreatedResponse>, AppError> {
    require_text("name", &org.name)?;
    let id = upsert_org(&state.db, org.name.trim()).await?;
    Ok(Json(CreatedResponse { id }))
}

/// GET /api/v1/reference-data
pub async fn handle_reference_data(
    State(state): State<AppState>,
) -> Result<Json<ReferenceData>, AppError> {
    Ok(Json(ReferenceData {
        organizations: list_orgs(&state.db).await?,
        locations: list_locations(&state.db).await?,
        statuses: list_statuses(&state.db).await?,
    }))
}

fn validate_new_job(job: &NewJob) -> Result<(), AppError> {
    require_text("title", &job.title)?;
    require_text("description", &job.description)?;
    validate_fit_rating(job.fit_rating)?;
    validate_salary_range(job.min_salary, job.max_salary)
}

fn validate_job_update(update: &JobUpdate) -> Result<(), AppError> {
    if update.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }
    // The stored row is not consulted, so one end alone could invert the range.
    if update.min_salary.is_some() != update.max_salary.is_some() {
        return Err(AppError::Validation(
            "min_salary and max_salary must be updated together".to_string(),
        ));
    }
    validate_fit_rating(update.fit_rating)?;
    validate_match_percentage(update.match_percentage)?;
    validate_salary_range(update.min_salary, update.max_salary)
}
