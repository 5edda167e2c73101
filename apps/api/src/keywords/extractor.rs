//! Keyword Extractor: job description in, cleaned multi-word keyword phrases out.
//!
//! The completion model answers in loose free text (bullets, numbered lines,
//! comma lists, "Keywords:" headers). Cleanup is a fixed, deterministic pass
//! over that text and never fails: the worst case is an empty list.

use crate::completion::{CompletionParams, CompletionService};
use crate::keywords::lead_in::LeadInPatterns;
use crate::keywords::prompts::extraction_prompt;
use crate::keywords::KeywordError;

/// Characters stripped from the front of every candidate token.
const TOKEN_DECORATION: &[char] = &[' ', '-', '*'];

/// Asks the completion service for two-word keywords and cleans its answer.
pub async fn extract_keywords(
    job_description: &str,
    llm: &dyn CompletionService,
    lead_ins: &LeadInPatterns,
) -> Result<Vec<String>, KeywordError> {
    if job_description.trim().is_empty() {
        return Err(KeywordError::EmptyInput("job description"));
    }

    let prompt = extraction_prompt(job_description);
    let completion = llm.complete(&prompt, CompletionParams::EXTRACTION).await?;

    Ok(clean_keywords(completion.text.trim(), lead_ins))
}

/// Turns raw completion text into an ordered list of multi-word phrases.
///
/// 1. `/` becomes a space
/// 2. lead-ins are stripped from the start of the text
/// 3. split on commas and newlines
/// 4. leading spaces, dashes and asterisks are stripped from each token
/// 5. tokens with fewer than two words are dropped
/// 6. survivors are trimmed
pub fn clean_keywords(raw: &str, lead_ins: &LeadInPatterns) -> Vec<String> {
    let text = raw.replace('/', " ");
    let text = lead_ins.strip_leading(&text);

    text.split([',', '\n'])
        .map(|token| strip_decoration(token, lead_ins))
        .filter(|token| token.split_whitespace().count() > 1)
        .map(|token| token.trim().to_string())
        .collect()
}

/// Strips bullet decoration, plus any lead-in that only shows up once the
/// bullet is gone ("- Keywords: Data Science").
fn strip_decoration<'a>(token: &'a str, lead_ins: &LeadInPatterns) -> &'a str {
    let mut rest = token;
    loop {
        let undecorated = rest.trim_start_matches(TOKEN_DECORATION);
        let stripped = lead_ins.strip_leading(undecorated);
        if stripped.len() == rest.len() {
            return rest;
        }
        rest = stripped;
    }
}
