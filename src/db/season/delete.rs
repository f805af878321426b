use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

/// Cards and attempts go with the season through `ON DELETE CASCADE`.
pub async fn delete_season(season_id: Uuid, postgres: &PgPool) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM seasons WHERE id = $1")
        .bind(season_id)
        .execute(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete season: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
