use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

pub async fn delete_attempt(attempt_id: Uuid, postgres: &PgPool) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM attempts WHERE id = $1")
        .bind(attempt_id)
        .execute(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete attempt: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
