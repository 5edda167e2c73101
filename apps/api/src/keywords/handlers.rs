//! Axum route handlers for the keyword pipeline.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::queries::get_job_description;
use crate::keywords::extractor::extract_keywords;
use crate::keywords::matcher::{match_keywords, MatchResult};
use crate::keywords::reviser::revise_resume;
use crate::keywords::KeywordError;
use crate::resumes::provider::ResumeSource;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub job_desc: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume: ResumeSource,
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_desc: String,
    pub resume: ResumeSource,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeJobRequest {
    pub resume: ResumeSource,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub result: MatchResult,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    pub resume: ResumeSource,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviseResponse {
    pub edited_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/keywords/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, AppError> {
    let keywords = extract_keywords(&request.job_desc, state.llm.as_ref(), &state.lead_ins).await?;
    info!("Extracted {} keywords", keywords.len());
    Ok(Json(ExtractResponse { keywords }))
}

/// POST /api/v1/keywords/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResult>, AppError> {
    let resume_text = request.resume.resolve(state.resumes.as_ref()).await?;
    let result = match_keywords(&resume_text, &request.keywords)?;
    Ok(Json(result))
}

/// POST /api/v1/analyze
///
/// Extract keywords from the job description, then match them against the resume.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    analyze(&state, &request.job_desc, &request.resume)
        .await
        .map(Json)
}

/// POST /api/v1/jobs/:id/analyze
///
/// Same as `/analyze`, using the stored description of a saved job.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let job_desc = get_job_description(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    analyze(&state, &job_desc, &request.resume).await.map(Json)
}

/// POST /api/v1/revise
///
/// Rewrites the resume to include the missing keywords. With nothing missing,
/// the resume comes back unchanged and no completion call is made.
pub async fn handle_revise(
    State(state): State<AppState>,
    Json(request): Json<ReviseRequest>,
) -> Result<Json<ReviseResponse>, AppError> {
    let resume_text = request.resume.resolve(state.resumes.as_ref()).await?;

    if request.missing_keywords.is_empty() {
        if resume_text.trim().is_empty() {
            return Err(KeywordError::EmptyInput("resume text").into());
        }
        return Ok(Json(ReviseResponse {
            edited_text: resume_text,
        }));
    }

    info!(
        "Revising resume with {} missing keywords",
        request.missing_keywords.len()
    );
    let edited_text =
        revise_resume(&resume_text, &request.missing_keywords, state.llm.as_ref()).await?;

    Ok(Json(ReviseResponse { edited_text }))
}

async fn analyze(
    state: &AppState,
    job_desc: &str,
    resume: &ResumeSource,
) -> Result<AnalyzeResponse, AppError> {
    // Resolve and check the resume first so a bad request never costs a completion call.
    let resume_text = resume.resolve(state.resumes.as_ref()).await?;
    if resume_text.trim().is_empty() {
        return Err(KeywordError::EmptyInput("resume text").into());
    }

    let keywords = extract_keywords(job_desc, state.llm.as_ref(), &state.lead_ins).await?;
    let result = match_keywords(&resume_text, &keywords)?;

    info!(
        "Analyzed resume: {} keywords, {} found, {} missing",
        keywords.len(),
        result.found_keywords.len(),
        result.missing_keywords.len()
    );

    Ok(AnalyzeResponse { keywords, result })
}
