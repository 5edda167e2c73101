use std::sync::Arc;

use sqlx::PgPool;

use crate::completion::CompletionService;
use crate::keywords::lead_in::LeadInPatterns;
use crate::resumes::provider::ResumeProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Completion backend. Default: `OpenAiClient`, built once from `Config`.
    pub llm: Arc<dyn CompletionService>,
    /// Where stored resumes are read from when a request names one by id.
    pub resumes: Arc<dyn ResumeProvider>,
    /// Lead-in phrases stripped from keyword completions.
    pub lead_ins: Arc<LeadInPatterns>,
}
