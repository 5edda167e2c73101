//! Field rules for job create / update requests.

use crate::errors::AppError;

pub const FIT_RATING_RANGE: std::ops::RangeInclusive<i16> = 1..=5;
pub const MATCH_PERCENTAGE_RANGE: std::ops::RangeInclusive<i16> = 0..=100;

pub fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn validate_fit_rating(rating: Option<i16>) -> Result<(), AppError> {
    match rating {
        Some(r) if !FIT_RATING_RANGE.contains(&r) => Err(AppError::Validation(format!(
            "fit_rating must be between 1 and 5, got {r}"
        ))),
        _ => Ok(()),
    }
}

pub fn validate_match_percentage(pct: Option<i16>) -> Result<(), AppError> {
    match pct {
        Some(p) if !MATCH_PERCENTAGE_RANGE.contains(&p) => Err(AppError::Validation(format!(
            "match_percentage must be between 0 and 100, got {p}"
        ))),
        _ => Ok(()),
    }
}

/// Only checked when both ends are present.
pub fn validate_salary_range(min: Option<i32>, max: Option<i32>) -> Result<(), AppError> {
    if let (Some(min), Some(max)) = (min, max) {
        if max <= min {
            return Err(AppError::Validation(
                "max_salary must be greater than min_salary".to_string(),
            ));
        }
    }
    Ok(())
}
