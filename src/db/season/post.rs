use sqlx::PgPool;
use uuid::Uuid;

use super::get::SEASON_COLUMNS;
use crate::{
    errors::AppError,
    models::season::{NewSeason, Season},
};

pub async fn create_season(season: NewSeason, postgres: &PgPool) -> Result<Season, AppError> {
    let season = sqlx::query_as::<_, Season>(&format!(
        "INSERT INTO seasons (id, name, description, created_by_id)
        VALUES ($1, $2, $3, $4)
        RETURNING {SEASON_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(&season.name)
    .bind(&season.description)
    .bind(season.created_by_id)
    .fetch_one(postgres)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AppError::BadRequest(
            format!("Season with name '{}' already exists", season.name),
        ),
        e => AppError::DatabaseError(format!("Failed to create season: {}", e)),
    })?;

    Ok(season)
}
