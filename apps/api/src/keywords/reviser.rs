//! Resume Reviser: asks the completion model to work missing keywords into a resume.

use crate::completion::{CompletionParams, CompletionService};
use crate::keywords::prompts::revision_prompt;
use crate::keywords::KeywordError;

/// Returns the model's rewritten resume exactly as produced.
///
/// An empty `missing_keywords` still issues the call. Callers that want to
/// skip the round trip must check for that themselves.
pub async fn revise_resume(
    resume_text: &str,
    missing_keywords: &[String],
    llm: &dyn CompletionService,
) -> Result<String, KeywordError> {
    if resume_text.trim().is_empty() {
        return Err(KeywordError::EmptyInput("resume text"));
    }

    let keywords = missing_keywords.join(",");
    let prompt = revision_prompt(&keywords, resume_text);
    let completion = llm.complete(&prompt, CompletionParams::REVISION).await?;

    Ok(completion.text)
}
