use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::card::{Card, Difficulty},
};

pub(crate) const CARD_COLUMNS: &str = "id, season_id, difficulty, card_number, question, \
    correct_answer, usage_count, last_used, created_at, updated_at";

pub async fn get_card_by_id(card_id: Uuid, postgres: &PgPool) -> Result<Option<Card>, AppError> {
    sqlx::query_as::<_, Card>(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"))
        .bind(card_id)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch card: {}", e)))
}

/// Cards of a season ordered by difficulty then card number.
pub async fn get_cards(
    season_id: Uuid,
    difficulty: Option<Difficulty>,
    postgres: &PgPool,
) -> Result<Vec<Card>, AppError> {
    sqlx::query_as::<_, Card>(&format!(
        "SELECT {CARD_COLUMNS}
            FROM cards
            WHERE season_id = $1 AND ($2::difficulty IS NULL OR difficulty = $2)
            ORDER BY difficulty, card_number"
    ))
    .bind(season_id)
    .bind(difficulty)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch cards: {}", e)))
}

pub async fn count_cards(
    season_id: Uuid,
    difficulty: Difficulty,
    postgres: &PgPool,
) -> Result<u64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM cards WHERE season_id = $1 AND difficulty = $2",
    )
    .bind(season_id)
    .bind(difficulty)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to count cards: {}", e)))?;

    Ok(count as u64)
}

pub async fn get_card_numbers(
    season_id: Uuid,
    difficulty: Difficulty,
    postgres: &PgPool,
) -> Result<Vec<i32>, AppError> {
    sqlx::query_scalar::<_, i32>(
        "SELECT card_number FROM cards
            WHERE season_id = $1 AND difficulty = $2
            ORDER BY card_number",
    )
    .bind(season_id)
    .bind(difficulty)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch card numbers: {}", e)))
}

pub async fn get_unused_cards(
    season_id: Uuid,
    difficulty: Difficulty,
    postgres: &PgPool,
) -> Result<Vec<Card>, AppError> {
    sqlx::query_as::<_, Card>(&format!(
        "SELECT {CARD_COLUMNS}
            FROM cards
            WHERE season_id = $1 AND difficulty = $2 AND usage_count = 0
            ORDER BY card_number"
    ))
    .bind(season_id)
    .bind(difficulty)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch unused cards: {}", e)))
}

/// Every card whose usage is at or below the `window`-th lowest in the deck,
/// so ties at the window's edge are all returned.
pub async fn get_least_used_cards(
    season_id: Uuid,
    difficulty: Difficulty,
    window: u32,
    postgres: &PgPool,
) -> Result<Vec<Card>, AppError> {
    sqlx::query_as::<_, Card>(&format!(
        "SELECT {CARD_COLUMNS}
            FROM cards
            WHERE season_id = $1 AND difficulty = $2
              AND usage_count <= COALESCE(
                  (SELECT usage_count FROM cards
                      WHERE season_id = $1 AND difficulty = $2
                      ORDER BY usage_count
                      OFFSET $3 - 1 LIMIT 1),
                  2147483647)
            ORDER BY usage_count, card_number"
    ))
    .bind(season_id)
    .bind(difficulty)
    .bind(window.max(1) as i64)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch least used cards: {}", e)))
}
