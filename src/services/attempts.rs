use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::{
        attempt::{Attempt, AttemptDetail, AttemptFilter, ContestantPerformance, NewAttempt},
        card::Difficulty,
        pagination::{PageRequest, Paginated},
    },
    services::{aggregate, cards},
};

/// Case-insensitive comparison of trimmed answers. No fuzzy matching.
pub fn calculate_answer_correctness(given_answer: &str, correct_answer: &str) -> bool {
    given_answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
}

pub async fn record_attempt(
    store: &dyn TriviaStore,
    card_id: Uuid,
    contestant_name: &str,
    given_answer: &str,
    is_correct: bool,
    recorded_by: Uuid,
) -> Result<Attempt, AppError> {
    let contestant_name = contestant_name.trim();
    if contestant_name.is_empty() {
        return Err(AppError::BadRequest(
            "Contestant name must not be empty".into(),
        ));
    }

    let attempt = NewAttempt {
        card_id,
        contestant_name: contestant_name.to_string(),
        given_answer: given_answer.trim().to_string(),
        is_correct,
        recorded_by_id: recorded_by,
    };

    let recorded = store
        .record_attempt(attempt, Utc::now())
        .await
        .map_err(AppError::into_attempt_recording)?
        .ok_or(AppError::CardNotFound(card_id))?;

    tracing::info!(
        "Recorded attempt {} by '{}' on card {} (correct: {})",
        recorded.id,
        recorded.contestant_name,
        card_id,
        recorded.is_correct
    );

    Ok(recorded)
}

pub async fn record_attempt_with_validation(
    store: &dyn TriviaStore,
    card_id: Uuid,
    contestant_name: &str,
    given_answer: &str,
    recorded_by: Uuid,
) -> Result<Attempt, AppError> {
    let card = store
        .get_card(card_id)
        .await
        .map_err(AppError::into_attempt_recording)?
        .ok_or(AppError::CardNotFound(card_id))?;

    let is_correct = calculate_answer_correctness(given_answer, &card.correct_answer);

    record_attempt(
        store,
        card_id,
        contestant_name,
        given_answer,
        is_correct,
        recorded_by,
    )
    .await
}

pub async fn get_attempt_history(
    store: &dyn TriviaStore,
    filter: AttemptFilter,
    page: PageRequest,
) -> Result<Paginated<AttemptDetail>, AppError> {
    let total = store.count_attempts(&filter).await?;
    let items = store.find_attempts(&filter, Some(page)).await?;
    Ok(Paginated::new(items, total, page))
}

pub async fn get_contestant_performance(
    store: &dyn TriviaStore,
    contestant_name: &str,
    season_id: Option<Uuid>,
) -> Result<ContestantPerformance, AppError> {
    let name = contestant_name.trim();
    let filter = AttemptFilter {
        season_id,
        exact_contestant: Some(name.to_string()),
        ..Default::default()
    };

    let attempts = store.find_attempts(&filter, None).await?;
    if attempts.is_empty() {
        return Err(AppError::ContestantNotFound(name.to_string()));
    }

    Ok(aggregate::contestant_performance(name, &attempts))
}

pub async fn reset_deck(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
) -> Result<u64, AppError> {
    cards::reset_deck_usage(store, season_id, difficulty).await
}

/// Administrative override of an attempt's correctness.
pub async fn correct_attempt(
    store: &dyn TriviaStore,
    attempt_id: Uuid,
    is_correct: bool,
) -> Result<Attempt, AppError> {
    let attempt = store
        .set_attempt_correctness(attempt_id, is_correct)
        .await?
        .ok_or(AppError::AttemptNotFound(attempt_id))?;

    tracing::info!(
        "Attempt {} marked {}",
        attempt_id,
        if is_correct { "correct" } else { "incorrect" }
    );
    Ok(attempt)
}

pub async fn delete_attempt(store: &dyn TriviaStore, attempt_id: Uuid) -> Result<bool, AppError> {
    let deleted = store.delete_attempt(attempt_id).await?;
    if deleted {
        tracing::info!("Deleted attempt {}", attempt_id);
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correctness_ignores_case_and_outer_whitespace() {
        assert!(calculate_answer_correctness("  TypeScript ", "TypeScript"));
        assert!(calculate_answer_correctness("typescript", "TYPESCRIPT"));
        assert!(!calculate_answer_correctness("JavaScript", "TypeScript"));
        assert!(!calculate_answer_correctness("Type Script", "TypeScript"));
    }
}
