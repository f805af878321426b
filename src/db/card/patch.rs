use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::get::CARD_COLUMNS;
use crate::{
    errors::AppError,
    models::card::{Card, CardUpdate, Difficulty},
};

pub async fn update_card(
    card_id: Uuid,
    update: CardUpdate,
    postgres: &PgPool,
) -> Result<Option<Card>, AppError> {
    sqlx::query_as::<_, Card>(&format!(
        "UPDATE cards
            SET question = COALESCE($2, question),
                correct_answer = COALESCE($3, correct_answer),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CARD_COLUMNS}"
    ))
    .bind(card_id)
    .bind(&update.question)
    .bind(&update.correct_answer)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to update card: {}", e)))
}

/// Increment-and-fetch in one statement. With `expected_usage` set the
/// update only lands if nobody drew the card since it was read.
pub async fn increment_usage(
    card_id: Uuid,
    expected_usage: Option<i32>,
    now: DateTime<Utc>,
    postgres: &PgPool,
) -> Result<Option<Card>, AppError> {
    sqlx::query_as::<_, Card>(&format!(
        "UPDATE cards
            SET usage_count = usage_count + 1,
                last_used = $2,
                updated_at = $2
            WHERE id = $1 AND ($3::INTEGER IS NULL OR usage_count = $3)
            RETURNING {CARD_COLUMNS}"
    ))
    .bind(card_id)
    .bind(now)
    .bind(expected_usage)
    .fetch_optional(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to increment card usage: {}", e)))
}

pub async fn reset_deck_usage(
    season_id: Uuid,
    difficulty: Difficulty,
    postgres: &PgPool,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        "UPDATE cards
            SET usage_count = 0, last_used = NULL, updated_at = NOW()
            WHERE season_id = $1 AND difficulty = $2",
    )
    .bind(season_id)
    .bind(difficulty)
    .execute(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to reset deck: {}", e)))?;

    Ok(result.rows_affected())
}
