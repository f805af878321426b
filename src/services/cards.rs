use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::{
        attempt::AttemptFilter,
        card::{Card, CardUpdate, CardWithStats, DECK_CAPACITY, DeckStatus, Difficulty, NewCard},
        pagination::{PageRequest, Paginated},
    },
    services::{aggregate, seasons::ensure_season},
};

/// Smallest number in `1..=52` not present in `used`.
pub fn next_available_card_number(used: &[i32]) -> Option<i32> {
    (1..=DECK_CAPACITY).find(|n| !used.contains(n))
}

fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub async fn create_card(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
    card_number: i32,
    question: &str,
    correct_answer: &str,
) -> Result<Card, AppError> {
    if !(1..=DECK_CAPACITY).contains(&card_number) {
        return Err(AppError::BadRequest(format!(
            "Card number must be between 1 and {DECK_CAPACITY}"
        )));
    }
    let question = required_text(question, "Question")?;
    let correct_answer = required_text(correct_answer, "Correct answer")?;
    ensure_season(store, season_id).await?;

    let count = store.count_cards(season_id, difficulty).await?;
    if count >= DECK_CAPACITY as u64 {
        return Err(AppError::DeckFull {
            season_id,
            difficulty,
        });
    }

    let used = store.card_numbers(season_id, difficulty).await?;
    if used.contains(&card_number) {
        return Err(AppError::DuplicateCardNumber {
            difficulty,
            card_number,
        });
    }

    let card = store
        .insert_card(NewCard {
            season_id,
            difficulty,
            card_number,
            question,
            correct_answer,
        })
        .await?;

    tracing::info!(
        "Created {} card #{} in season {} (ID: {})",
        difficulty,
        card.card_number,
        season_id,
        card.id
    );

    Ok(card)
}

pub async fn get_next_available_card_number(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
) -> Result<Option<i32>, AppError> {
    let used = store.card_numbers(season_id, difficulty).await?;
    Ok(next_available_card_number(&used))
}

pub async fn create_card_with_auto_number(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
    question: &str,
    correct_answer: &str,
) -> Result<Card, AppError> {
    ensure_season(store, season_id).await?;

    let card_number = get_next_available_card_number(store, season_id, difficulty)
        .await?
        .ok_or(AppError::DeckFull {
            season_id,
            difficulty,
        })?;

    create_card(
        store,
        season_id,
        difficulty,
        card_number,
        question,
        correct_answer,
    )
    .await
}

pub async fn get_card_by_id(store: &dyn TriviaStore, card_id: Uuid) -> Result<Card, AppError> {
    store
        .get_card(card_id)
        .await?
        .ok_or(AppError::CardNotFound(card_id))
}

/// Only the question and answer are editable; number, difficulty and usage
/// history stay as they are.
pub async fn update_card(
    store: &dyn TriviaStore,
    card_id: Uuid,
    update: CardUpdate,
) -> Result<Card, AppError> {
    let update = CardUpdate {
        question: update
            .question
            .as_deref()
            .map(|q| required_text(q, "Question"))
            .transpose()?,
        correct_answer: update
            .correct_answer
            .as_deref()
            .map(|a| required_text(a, "Correct answer"))
            .transpose()?,
    };

    if update.is_empty() {
        return get_card_by_id(store, card_id).await;
    }

    let card = store
        .update_card(card_id, update)
        .await?
        .ok_or(AppError::CardNotFound(card_id))?;

    tracing::info!("Updated card {} (#{} {})", card.id, card.card_number, card.difficulty);
    Ok(card)
}

pub async fn delete_card(store: &dyn TriviaStore, card_id: Uuid) -> Result<bool, AppError> {
    let deleted = store.delete_card(card_id).await?;
    if deleted {
        tracing::info!("Deleted card {}", card_id);
    }
    Ok(deleted)
}

pub async fn get_cards_by_deck(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
    page: PageRequest,
) -> Result<Paginated<CardWithStats>, AppError> {
    ensure_season(store, season_id).await?;

    let cards = store.list_cards(season_id, Some(difficulty)).await?;
    let attempts = store
        .find_attempts(&AttemptFilter::season(season_id), None)
        .await?;

    let total = cards.len() as u64;
    let page_cards = page.slice(&cards);
    let items = aggregate::cards_with_stats(&page_cards, &attempts);

    Ok(Paginated::new(items, total, page))
}

pub async fn get_deck_status(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
) -> Result<DeckStatus, AppError> {
    let cards = store.list_cards(season_id, Some(difficulty)).await?;
    Ok(aggregate::deck_status(&cards))
}

pub async fn reset_deck_usage(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
) -> Result<u64, AppError> {
    let affected = store.reset_deck_usage(season_id, difficulty).await?;
    tracing::info!(
        "Reset usage for {} cards in the {} deck of season {}",
        affected,
        difficulty,
        season_id
    );
    Ok(affected)
}
