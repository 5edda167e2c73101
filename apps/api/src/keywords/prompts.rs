// Prompt templates for the keyword pipeline.
// Wording is kept verbatim: the cleanup stage in `extractor` is tuned to the
// output these exact prompts produce.

/// Keyword extraction prompt for a raw job description.
pub fn extraction_prompt(job_description: &str) -> String {
    format!(
        "List the important two-word keywords in the job description, below.  \
         Remove all keywords that start or end with pronouns. \
         Sort the list alphabetically. \n\nText:\n{job_description}\n"
    )
}

/// Revision prompt. `keywords` is the comma-joined missing keyword list.
pub fn revision_prompt(keywords: &str, resume_text: &str) -> String {
    format!(
        "Your task is to rewrite the Resume by inserting each of the Keywords into the Resume. \
         Return the edited Resume. \n\nKeywords:\n{keywords} \n\nResume:\n{resume_text}\n"
    )
}
