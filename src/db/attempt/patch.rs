use sqlx::PgPool;
use uuid::Uuid;

use super::get::ATTEMPT_COLUMNS;
use crate::{errors::AppError, models::attempt::Attempt};

pub async fn set_attempt_correctness(
    attempt_id: Uuid,
    is_correct: bool,
    postgres: &PgPool,
) -> Result<Option<Attempt>, AppError> {
    sqlx::query_as::<_, Attempt>(&format!(
        "UPDATE attempts SET is_correct = $2 WHERE id = $1 RETURNING {ATTEMPT_COLUMNS}"
    ))
    .bind(attempt_id)
    .bind(is_correct)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to correct attempt: {}", e)))
}
