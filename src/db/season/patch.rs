use sqlx::PgPool;
use uuid::Uuid;

use super::get::SEASON_COLUMNS;
use crate::{
    errors::AppError,
    models::season::{Season, SeasonUpdate},
};

pub async fn update_season(
    season_id: Uuid,
    update: SeasonUpdate,
    postgres: &PgPool,
) -> Result<Option<Season>, AppError> {
    sqlx::query_as::<_, Season>(&format!(
        "UPDATE seasons
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SEASON_COLUMNS}"
    ))
    .bind(season_id)
    .bind(&update.name)
    .bind(&update.description)
    .fetch_optional(postgres)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::BadRequest("A season with that name already exists".into())
        }
        e => AppError::DatabaseError(format!("Failed to update season: {}", e)),
    })
}
