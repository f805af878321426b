use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::get::ATTEMPT_COLUMNS;
use crate::{
    errors::AppError,
    models::attempt::{Attempt, NewAttempt},
};

/// Checks the card and inserts the attempt in one transaction. Returns
/// `None` when the card does not exist.
pub async fn record_attempt(
    attempt: NewAttempt,
    now: DateTime<Utc>,
    postgres: &PgPool,
) -> Result<Option<Attempt>, AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to start transaction: {}", e)))?;

    let season_id =
        sqlx::query_scalar::<_, Uuid>("SELECT season_id FROM cards WHERE id = $1 FOR SHARE")
            .bind(attempt.card_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch card: {}", e)))?;

    let Some(season_id) = season_id else {
        tx.rollback()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to rollback: {}", e)))?;
        return Ok(None);
    };

    let recorded = sqlx::query_as::<_, Attempt>(&format!(
        "INSERT INTO attempts
            (id, card_id, season_id, contestant_name, given_answer, is_correct,
             attempted_at, recorded_by_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {ATTEMPT_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(attempt.card_id)
    .bind(season_id)
    .bind(&attempt.contestant_name)
    .bind(&attempt.given_answer)
    .bind(attempt.is_correct)
    .bind(now)
    .bind(attempt.recorded_by_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to insert attempt: {}", e)))?;

    tx.commit()
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to commit attempt: {}", e)))?;

    Ok(Some(recorded))
}
