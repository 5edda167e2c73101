//! Resume Keyword Matcher: splits a keyword list into found / missing.
//!
//! Matching is plain case-insensitive substring containment: no tokenization,
//! stemming or word boundaries. "data science" is found inside
//! "big data sciences".

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordError;

/// Partition of a keyword list against one resume. Both sides keep the input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub found_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
}

pub fn match_keywords(resume_text: &str, keywords: &[String]) -> Result<MatchResult, KeywordError> {
    if resume_text.trim().is_empty() {
        return Err(KeywordError::EmptyInput("resume text"));
    }

    let resume_lower = resume_text.to_lowercase();
    let mut result = MatchResult::default();

    for keyword in keywords {
        if resume_lower.contains(&keyword.to_lowercase()) {
            result.found_keywords.push(keyword.clone());
        } else {
            result.missing_keywords.push(keyword.clone());
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_found_and_missing_case_insensitive() {
        let resume = "Experienced Strategic Product Manager with strong execution focus";
        let keywords = kws(&["Strategic Product", "Execution Focus", "Data Science"]);

        let result = match_keywords(resume, &keywords).unwrap();
        assert_eq!(
            result.found_keywords,
            kws(&["Strategic Product", "Execution Focus"])
        );
        assert_eq!(result.missing_keywords, kws(&["Data Science"]));
    }

    #[test]
    fn test_empty_resume_is_rejected() {
        let err = match_keywords("", &kws(&["Data Science"])).unwrap_err();
        assert!(matches!(err, KeywordError::EmptyInput("resume text")));

        let err = match_keywords(" \n ", &kws(&["Data Science"])).unwrap_err();
        assert!(matches!(err, KeywordError::EmptyInput(_)));
    }

    #[test]
    fn test_empty_keyword_list_is_valid() {
        let result = match_keywords("Rust engineer", &[]).unwrap();
        assert_eq!(result, MatchResult::default());
    }

    #[test]
    fn test_substring_without_word_boundary_counts() {
        let result = match_keywords("Big data sciences team lead", &kws(&["data science"])).unwrap();
        assert_eq!(result.found_keywords, kws(&["data science"]));
    }

    #[test]
    fn test_any_case_variant_is_found() {
        for (resume, keyword) in [
            ("PRODUCT ROADMAP", "product roadmap"),
            ("product roadmap", "PRODUCT ROADMAP"),
            ("Owned the pRoDuCt RoAdMaP", "Product Roadmap"),
        ] {
            let result = match_keywords(resume, &kws(&[keyword])).unwrap();
            assert_eq!(result.found_keywords, kws(&[keyword]), "{resume} / {keyword}");
        }
    }

    #[test]
    fn test_output_preserves_original_case() {
        let result = match_keywords("customer support", &kws(&["Customer Support"])).unwrap();
        assert_eq!(result.found_keywords, kws(&["Customer Support"]));
    }

    #[test]
    fn test_partition_preserves_order_and_multiset() {
        let resume = "Led API Design and Cloud Platforms migration; mentored on Data Pipelines";
        let keywords = kws(&[
            "Cloud Platforms",
            "Machine Learning",
            "API Design",
            "Machine Learning",
            "Data Pipelines",
            "Incident Response",
        ]);

        let result = match_keywords(resume, &keywords).unwrap();
        assert_eq!(
            result.found_keywords,
            kws(&["Cloud Platforms", "API Design", "Data Pipelines"])
        );
        assert_eq!(
            result.missing_keywords,
            kws(&["Machine Learning", "Machine Learning", "Incident Response"])
        );
        assert_eq!(
            result.found_keywords.len() + result.missing_keywords.len(),
            keywords.len()
        );

        // Interleaving the partitions back by membership rebuilds the input.
        let mut found = result.found_keywords.iter();
        let mut missing = result.missing_keywords.iter();
        let rebuilt: Vec<&String> = keywords
            .iter()
            .map(|k| {
                if resume.to_lowercase().contains(&k.to_lowercase()) {
                    found.next().unwrap()
                } else {
                    missing.next().unwrap()
                }
            })
            .collect();
        assert_eq!(rebuilt, keywords.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_match_result_serializes_with_snake_case_fields() {
        let result = MatchResult {
            found_keywords: kws(&["Data Science"]),
            missing_keywords: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["found_keywords"][0], "Data Science");
        assert!(json["missing_keywords"].as_array().unwrap().is_empty());
    }
}
