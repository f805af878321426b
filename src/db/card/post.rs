use sqlx::PgPool;
use uuid::Uuid;

use super::get::CARD_COLUMNS;
use crate::{
    errors::AppError,
    models::card::{Card, NewCard},
};

/// The `(season_id, difficulty, card_number)` unique key turns a concurrent
/// duplicate insert into `DuplicateCardNumber`.
pub async fn create_card(card: NewCard, postgres: &PgPool) -> Result<Card, AppError> {
    sqlx::query_as::<_, Card>(&format!(
        "INSERT INTO cards (id, season_id, difficulty, card_number, question, correct_answer)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {CARD_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(card.season_id)
    .bind(card.difficulty)
    .bind(card.card_number)
    .bind(&card.question)
    .bind(&card.correct_answer)
    .fetch_one(postgres)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::DuplicateCardNumber {
                difficulty: card.difficulty,
                card_number: card.card_number,
            }
        }
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::SeasonNotFound(card.season_id)
        }
        e => AppError::DatabaseError(format!("Failed to create card: {}", e)),
    })
}
