mod common;

use common::{fill_deck, season, store};
use deckshow_be::{
    db::TriviaStore,
    errors::AppError,
    models::{
        card::{CardUpdate, Difficulty},
        pagination::PageRequest,
    },
    services::cards,
};
use uuid::Uuid;

#[tokio::test]
async fn test_create_card_in_empty_deck() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;

    let card = cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, 1, "Q", "A")
        .await
        .unwrap();

    assert_eq!(card.card_number, 1);
    assert_eq!(card.usage_count, 0);
    assert!(card.last_used.is_none());
    assert_eq!(card.season_id, s1.id);
}

#[tokio::test]
async fn test_full_deck_rejects_53rd_card() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    fill_deck(&store, s1.id, Difficulty::Hard, 52).await;

    let err = cards::create_card_with_auto_number(store.as_ref(), s1.id, Difficulty::Hard, "Q", "A")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DeckFull { difficulty: Difficulty::Hard, .. }));

    // Other decks of the same season are unaffected
    cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, 52, "Q", "A")
        .await
        .unwrap();
    assert_eq!(store.count_cards(s1.id, Difficulty::Hard).await.unwrap(), 52);
}

#[tokio::test]
async fn test_full_deck_is_checked_before_duplicate_number() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    fill_deck(&store, s1.id, Difficulty::Medium, 52).await;

    let err = cards::create_card(store.as_ref(), s1.id, Difficulty::Medium, 7, "Q", "A")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DeckFull { .. }));
}

#[tokio::test]
async fn test_duplicate_card_number() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, 5, "Q", "A")
        .await
        .unwrap();

    let err = cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, 5, "Q2", "A2")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::DuplicateCardNumber {
            difficulty: Difficulty::Easy,
            card_number: 5
        }
    ));

    // The rejected insert leaves the deck untouched
    let deck = store.list_cards(s1.id, Some(Difficulty::Easy)).await.unwrap();
    assert_eq!(deck.len(), 1);
    assert_eq!(deck[0].card_number, 5);
    assert_eq!(deck[0].question, "Q");

    // Same number in another deck is fine
    cards::create_card(store.as_ref(), s1.id, Difficulty::Hard, 5, "Q", "A")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_card_number_out_of_range() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;

    for number in [0, 53, -1] {
        let err = cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, number, "Q", "A")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)), "number {number}");
    }
}

#[tokio::test]
async fn test_create_card_in_missing_season() {
    let store = store();
    let missing = Uuid::new_v4();

    let err = cards::create_card(store.as_ref(), missing, Difficulty::Easy, 1, "Q", "A")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SeasonNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_auto_number_fills_first_gap() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    for n in [1, 3] {
        cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, n, "Q", "A")
            .await
            .unwrap();
    }

    let next = cards::get_next_available_card_number(store.as_ref(), s1.id, Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(next, Some(2));

    let card =
        cards::create_card_with_auto_number(store.as_ref(), s1.id, Difficulty::Easy, "Q", "A")
            .await
            .unwrap();
    assert_eq!(card.card_number, 2);

    let next = cards::get_next_available_card_number(store.as_ref(), s1.id, Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(next, Some(4));
}

#[tokio::test]
async fn test_next_number_of_full_deck_is_none() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    fill_deck(&store, s1.id, Difficulty::Easy, 52).await;

    let next = cards::get_next_available_card_number(store.as_ref(), s1.id, Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(next, None);
}

#[tokio::test]
async fn test_update_card_keeps_usage_history() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let card = cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, 1, "Q", "A")
        .await
        .unwrap();
    store
        .increment_usage(card.id, None, chrono::Utc::now())
        .await
        .unwrap();

    let updated = cards::update_card(
        store.as_ref(),
        card.id,
        CardUpdate {
            question: Some("  New question ".into()),
            correct_answer: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.question, "New question");
    assert_eq!(updated.correct_answer, "A");
    assert_eq!(updated.usage_count, 1);
    assert_eq!(updated.card_number, 1);

    let err = cards::update_card(store.as_ref(), Uuid::new_v4(), CardUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CardNotFound(_)));
}

#[tokio::test]
async fn test_delete_card_frees_its_number() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let deck = fill_deck(&store, s1.id, Difficulty::Easy, 3).await;

    assert!(cards::delete_card(store.as_ref(), deck[1].id).await.unwrap());
    assert!(!cards::delete_card(store.as_ref(), deck[1].id).await.unwrap());

    let next = cards::get_next_available_card_number(store.as_ref(), s1.id, Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(next, Some(2));
}

#[tokio::test]
async fn test_cards_by_deck_are_ordered_and_paginated() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    for n in [9, 2, 5, 1] {
        cards::create_card(store.as_ref(), s1.id, Difficulty::Medium, n, "Q", "A")
            .await
            .unwrap();
    }
    cards::create_card(store.as_ref(), s1.id, Difficulty::Easy, 3, "Q", "A")
        .await
        .unwrap();

    let page = cards::get_cards_by_deck(
        store.as_ref(),
        s1.id,
        Difficulty::Medium,
        PageRequest::new(1, 3),
    )
    .await
    .unwrap();

    let numbers: Vec<i32> = page.items.iter().map(|c| c.card.card_number).collect();
    assert_eq!(numbers, vec![1, 2, 5]);
    assert_eq!(page.total, 4);
    assert_eq!(page.total_pages, 2);
    assert!(page.items.iter().all(|c| c.total_attempts == 0 && c.success_rate == 0.0));
}

#[tokio::test]
async fn test_deck_status_counts_used_cards() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let deck = fill_deck(&store, s1.id, Difficulty::Easy, 4).await;
    store
        .increment_usage(deck[0].id, None, chrono::Utc::now())
        .await
        .unwrap();

    let status = cards::get_deck_status(store.as_ref(), s1.id, Difficulty::Easy)
        .await
        .unwrap();
    assert_eq!(status.total_cards, 4);
    assert_eq!(status.used_cards, 1);
    assert_eq!(status.available_cards, 3);
    assert_eq!(status.usage_percentage, 25.0);

    let empty = cards::get_deck_status(store.as_ref(), s1.id, Difficulty::Hard)
        .await
        .unwrap();
    assert_eq!(empty.total_cards, 0);
    assert_eq!(empty.usage_percentage, 0.0);
}
