use chrono::Utc;
use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::card::{Card, Difficulty},
};

/// Once every card has been drawn, picks come from this many least-used cards.
pub const LEAST_USED_WINDOW: u32 = 10;

/// Conditional increments attempted before falling back to a plain one.
pub const MAX_DRAW_ROUNDS: usize = 5;

pub fn pick_card<'a, R: Rng + ?Sized>(pool: &'a [Card], rng: &mut R) -> Option<&'a Card> {
    pool.choose(rng)
}

/// Narrows the least-used cards to the window, breaking usage ties at random.
pub fn least_used_window<R: Rng + ?Sized>(mut cards: Vec<Card>, rng: &mut R) -> Vec<Card> {
    cards.shuffle(rng);
    cards.sort_by_key(|c| c.usage_count);
    cards.truncate(LEAST_USED_WINDOW as usize);
    cards
}

/// Unused cards if any remain, otherwise the least-used window.
pub async fn candidate_pool<R: Rng + Send + ?Sized>(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Vec<Card>, AppError> {
    let unused = store.unused_cards(season_id, difficulty).await?;
    if !unused.is_empty() {
        return Ok(unused);
    }
    let least_used = store
        .least_used_cards(season_id, difficulty, LEAST_USED_WINDOW)
        .await?;
    Ok(least_used_window(least_used, rng))
}

/// Draws a card for live play and records its usage.
///
/// The increment is conditional on the usage count the pick was made from,
/// so two hosts drawing at once cannot both take the same unused card. The
/// loser re-reads the pool and picks again.
pub async fn draw_random_card<R: Rng + Send + ?Sized>(
    store: &dyn TriviaStore,
    season_id: Uuid,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Card, AppError> {
    let mut last_pick = None;

    for round in 1..=MAX_DRAW_ROUNDS {
        let pool = candidate_pool(store, season_id, difficulty, rng).await?;
        let Some(card) = pick_card(&pool, rng) else {
            return Err(AppError::DeckEmpty {
                season_id,
                difficulty,
            });
        };

        if let Some(drawn) = store
            .increment_usage(card.id, Some(card.usage_count), Utc::now())
            .await?
        {
            tracing::info!(
                "Drew {} card #{} from season {} (usage {})",
                difficulty,
                drawn.card_number,
                season_id,
                drawn.usage_count
            );
            return Ok(drawn);
        }

        tracing::warn!(
            "Draw round {}/{} lost card {} to a concurrent draw",
            round,
            MAX_DRAW_ROUNDS,
            card.id
        );
        last_pick = Some(card.id);
    }

    let card_id = last_pick.ok_or(AppError::InternalError)?;
    let drawn = store
        .increment_usage(card_id, None, Utc::now())
        .await?
        .ok_or(AppError::CardNotFound(card_id))?;

    tracing::warn!(
        "Draw fell back to unconditional increment for card {} after {} rounds",
        card_id,
        MAX_DRAW_ROUNDS
    );
    Ok(drawn)
}
