use axum::{extract::State, Json};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::errors::AppError;
use crate::models::preferences::ColumnPreferenceRow;
use crate::preferences::{default_preferences, validate_preferences};
use crate::state::AppState;

/// GET /api/v1/preferences/columns
pub async fn handle_get_preferences(
    State(state): State<AppState>,
) -> Result<Json<Vec<ColumnPreferenceRow>>, AppError> {
    Ok(Json(fetch_preferences(&state.db).await?))
}

/// PUT /api/v1/preferences/columns
///
/// Applies every entry or none of them.
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Json(prefs): Json<Vec<ColumnPreferenceRow>>,
) -> Result<Json<Vec<ColumnPreferenceRow>>, AppError> {
    validate_preferences(&prefs)?;

    let mut tx = state.db.begin().await?;
    for pref in &prefs {
        upsert_preference(&mut tx, pref).await?;
    }
    tx.commit().await?;

    info!("Updated {} column preferences", prefs.len());
    Ok(Json(fetch_preferences(&state.db).await?))
}

/// POST /api/v1/preferences/columns/reset
pub async fn handle_reset_preferences(
    State(state): State<AppState>,
) -> Result<Json<Vec<ColumnPreferenceRow>>, AppError> {
    let mut tx = state.db.begin().await?;
    sqlx::query("DELETE FROM column_preferences")
        .execute(&mut *tx)
        .await?;
    for pref in &default_preferences() {
        upsert_preference(&mut tx, pref).await?;
    }
    tx.commit().await?;

    info!("Reset column preferences to defaults");
    Ok(Json(fetch_preferences(&state.db).await?))
}

async fn fetch_preferences(pool: &PgPool) -> Result<Vec<ColumnPreferenceRow>, sqlx::Error> {
    sqlx::query_as::<_, ColumnPreferenceRow>(
        "SELECT column_name, is_visible, display_order FROM column_preferences ORDER BY display_order, column_name",
    )
    .fetch_all(pool)
    .await
}

async fn upsert_preference(
    tx: &mut Transaction<'_, Postgres>,
    pref: &ColumnPreferenceRow,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO column_preferences (column_name, is_visible, display_order)
        VALUES ($1, $2, $3)
        ON CONFLICT (column_name)
        DO UPDATE SET is_visible = EXCLUDED.is_visible, display_order = EXCLUDED.display_order
        "#,
    )
    .bind(&pref.column_name)
    .bind(pref.is_visible)
    .bind(pref.display_order)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
