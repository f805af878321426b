use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

pub async fn delete_card(card_id: Uuid, postgres: &PgPool) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM cards WHERE id = $1")
        .bind(card_id)
        .execute(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete card: {}", e)))?;

    Ok(result.rows_affected() > 0)
}
