//! Resume content lookup for the keyword pipeline.
//!
//! The pipeline only ever needs "the text of resume X". Where that text lives
//! (database blob, uploaded PDF) is hidden behind `ResumeProvider`.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::resumes::text::resume_text_from_bytes;

#[derive(Debug, Error)]
pub enum ResumeSourceError {
    #[error("Resume {0} not found")]
    NotFound(Uuid),

    #[error("Resume {id} could not be read: {reason}")]
    Unreadable { id: Uuid, reason: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Source of resume text, keyed by resume id.
#[async_trait]
pub trait ResumeProvider: Send + Sync {
    async fn fetch(&self, resume_id: Uuid) -> Result<String, ResumeSourceError>;
}

/// Reads the `resumes.content` blob and converts it to text.
pub struct PgResumeStore {
    pool: PgPool,
}

impl PgResumeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeProvider for PgResumeStore {
    async fn fetch(&self, resume_id: Uuid) -> Result<String, ResumeSourceError> {
        let content: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT content FROM resumes WHERE id = $1")
                .bind(resume_id)
                .fetch_optional(&self.pool)
                .await?;

        let content = content.ok_or(ResumeSourceError::NotFound(resume_id))?;

        // PDF extraction is CPU-bound and can panic on malformed files.
        tokio::task::spawn_blocking(move || resume_text_from_bytes(&content))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r)
            .map_err(|reason| ResumeSourceError::Unreadable {
                id: resume_id,
                reason,
            })
    }
}

/// How a request points at a resume: a stored one, or text pasted inline.
///
/// `{"resume_id": "..."}` or `{"text": "..."}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResumeSource {
    Stored { resume_id: Uuid },
    Inline { text: String },
}

impl ResumeSource {
    pub async fn resolve(
        &self,
        provider: &dyn ResumeProvider,
    ) -> Result<String, ResumeSourceError> {
        match self {
            ResumeSource::Stored { resume_id } => provider.fetch(*resume_id).await,
            ResumeSource::Inline { text } => Ok(text.clone()),
        }
    }
}
