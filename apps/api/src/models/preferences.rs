use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Visibility and position of one column in the job list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ColumnPreferenceRow {
    pub column_name: String,
    pub is_visible: bool,
    pub display_order: i32,
}
