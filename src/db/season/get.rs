use sqlx::PgPool;
use uuid::Uuid;

use crate::{errors::AppError, models::season::Season};

pub(crate) const SEASON_COLUMNS: &str =
    "id, name, description, created_by_id, created_at, updated_at";

pub async fn get_season_by_id(
    season_id: Uuid,
    postgres: &PgPool,
) -> Result<Option<Season>, AppError> {
    sqlx::query_as::<_, Season>(&format!("SELECT {SEASON_COLUMNS} FROM seasons WHERE id = $1"))
        .bind(season_id)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch season: {}", e)))
}

pub async fn get_season_by_name(
    name: &str,
    postgres: &PgPool,
) -> Result<Option<Season>, AppError> {
    sqlx::query_as::<_, Season>(&format!(
        "SELECT {SEASON_COLUMNS} FROM seasons WHERE name = $1"
    ))
    .bind(name)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to query season: {}", e)))
}

/// All seasons, newest first, optionally restricted to one creator.
pub async fn get_seasons(
    created_by: Option<Uuid>,
    postgres: &PgPool,
) -> Result<Vec<Season>, AppError> {
    sqlx::query_as::<_, Season>(&format!(
        "SELECT {SEASON_COLUMNS}
            FROM seasons
            WHERE ($1::UUID IS NULL OR created_by_id = $1)
            ORDER BY created_at DESC"
    ))
    .bind(created_by)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch seasons: {}", e)))
}
