// Keyword pipeline: extract keywords from a job description, match them
// against a resume, optionally rewrite the resume to cover the missing ones.
// Stateless and read-only. All completion calls go through `CompletionService`.

pub mod extractor;
pub mod handlers;
pub mod lead_in;
pub mod matcher;
pub mod prompts;
pub mod reviser;

use thiserror::Error;

use crate::completion::CompletionError;

#[derive(Debug, Error)]
pub enum KeywordError {
    /// A required text input was empty or whitespace-only.
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("completion service failed: {0}")]
    Upstream(#[from] CompletionError),
}
