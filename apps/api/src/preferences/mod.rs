//! Column visibility and ordering for the job list view.

pub mod handlers;

use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::preferences::ColumnPreferenceRow;

/// Factory layout: every column visible, in this order.
pub const DEFAULT_COLUMNS: [&str; 9] = [
    "job_position",
    "company",
    "location",
    "status",
    "date_saved",
    "deadline",
    "date_applied",
    "follow_up",
    "excitement",
];

pub fn default_preferences() -> Vec<ColumnPreferenceRow> {
    DEFAULT_COLUMNS
        .iter()
        .zip(1..)
        .map(|(name, order)| ColumnPreferenceRow {
            column_name: name.to_string(),
            is_visible: true,
            display_order: order,
        })
        .collect()
}

/// Rejects unknown or repeated column names and non-positive positions.
pub fn validate_preferences(prefs: &[ColumnPreferenceRow]) -> Result<(), AppError> {
    if prefs.is_empty() {
        return Err(AppError::Validation(
            "at least one column preference is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for pref in prefs {
        if !DEFAULT_COLUMNS.contains(&pref.column_name.as_str()) {
            return Err(AppError::Validation(format!(
                "unknown column: {}",
                pref.column_name
            )));
        }
        if !seen.insert(pref.column_name.as_str()) {
            return Err(AppError::Validation(format!(
                "duplicate column: {}",
                pref.column_name
            )));
        }
        if pref.display_order < 1 {
            return Err(AppError::Validation(format!(
                "display_order for {} must be positive",
                pref.column_name
            )));
        }
    }
    Ok(())
}
