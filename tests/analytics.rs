mod common;

use chrono::{DateTime, Duration, Utc};
use common::{fill_deck, season, store};
use deckshow_be::{
    db::{MemoryStore, TriviaStore},
    errors::AppError,
    models::{attempt::NewAttempt, card::Difficulty, season::Season},
    services::{analytics, attempts},
};
use uuid::Uuid;

/// Records `(contestant, card index, correct)` attempts against one EASY deck.
async fn play(store: &MemoryStore, season: &Season, rounds: &[(&str, usize, bool)]) {
    let producer = season.created_by_id;
    let deck = fill_deck(store, season.id, Difficulty::Easy, 3).await;
    for &(name, idx, correct) in rounds {
        attempts::record_attempt(store, deck[idx].id, name, "x", correct, producer)
            .await
            .unwrap();
    }
}

/// Records one attempt with an explicit timestamp.
async fn record_at(
    store: &MemoryStore,
    season: &Season,
    card_id: Uuid,
    name: &str,
    correct: bool,
    at: DateTime<Utc>,
) {
    store
        .record_attempt(
            NewAttempt {
                card_id,
                contestant_name: name.to_string(),
                given_answer: "x".to_string(),
                is_correct: correct,
                recorded_by_id: season.created_by_id,
            },
            at,
        )
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_contestant_rankings_order() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    play(
        &store,
        &s1,
        &[
            ("Ann", 0, true),
            ("Ann", 1, false),
            ("Bob", 0, true),
            ("Cal", 0, true),
            ("Cal", 1, true),
            ("Dee", 2, false),
        ],
    )
    .await;

    let rankings = analytics::get_contestant_performance_analytics(store.as_ref(), Some(s1.id))
        .await
        .unwrap();
    let order: Vec<&str> = rankings.iter().map(|r| r.contestant_name.as_str()).collect();

    // Equal rates rank the contestant with more attempts first
    assert_eq!(order, vec!["Cal", "Bob", "Ann", "Dee"]);
    assert_eq!(rankings[2].success_rate, 50.0);
    assert_eq!(rankings[3].success_rate, 0.0);
}

#[tokio::test]
async fn test_rankings_across_all_seasons() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let (_, s2) = season(&store, "S2").await;
    play(&store, &s1, &[("Ann", 0, true)]).await;
    play(&store, &s2, &[("Ann", 0, false), ("Bob", 0, true)]).await;

    let rankings = analytics::get_contestant_performance_analytics(store.as_ref(), None)
        .await
        .unwrap();
    assert_eq!(rankings.len(), 2);
    assert_eq!(rankings[0].contestant_name, "Bob");
    assert_eq!(rankings[1].total_attempts, 2);
}

#[tokio::test]
async fn test_empty_season_statistics_are_zero() {
    let store = store();
    let (_, s1) = season(&store, "Empty").await;

    let stats = analytics::get_season_statistics(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(stats.season_name, "Empty");
    assert_eq!(stats.total_cards, 0);
    assert_eq!(stats.total_attempts, 0);
    assert_eq!(stats.overall_success_rate, 0.0);
    assert!(stats.most_used_cards.is_empty());
    assert!(stats.least_used_cards.is_empty());
    assert!(stats.difficulty_stats.iter().all(|d| d.success_rate == 0.0));
}

#[tokio::test]
async fn test_season_statistics_totals() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    play(
        &store,
        &s1,
        &[("Ann", 0, true), ("Bob", 0, false), ("Cal", 1, true), ("Dee", 2, true)],
    )
    .await;

    let stats = analytics::get_season_statistics(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(stats.total_cards, 3);
    assert_eq!(stats.total_attempts, 4);
    assert_eq!(stats.overall_success_rate, 75.0);
}

#[tokio::test]
async fn test_missing_season_is_not_wrapped() {
    let store = store();
    let missing = Uuid::new_v4();

    let err = analytics::get_season_statistics(store.as_ref(), missing)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SeasonNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_storage_failure_is_wrapped_as_analytics_error() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;

    store.fail_operations(true);
    let err = analytics::get_real_time_analytics(store.as_ref(), s1.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Analytics(_)));
}

#[tokio::test]
async fn test_compare_seasons() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let (_, s2) = season(&store, "S2").await;
    play(&store, &s1, &[("Ann", 0, true), ("Bob", 1, false)]).await;
    play(&store, &s2, &[("Ann", 0, true)]).await;

    let comparison = analytics::compare_seasons(store.as_ref(), &[s1.id, s2.id])
        .await
        .unwrap();
    assert_eq!(comparison.seasons.len(), 2);

    let err = analytics::compare_seasons(store.as_ref(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = analytics::compare_seasons(store.as_ref(), &[s1.id, Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SeasonNotFound(_)));
}

#[tokio::test]
async fn test_export_contains_everything() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    play(&store, &s1, &[("Ann", 0, true), ("Bob", 1, false)]).await;

    let export = analytics::generate_export_data(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(export.season.id, s1.id);
    assert_eq!(export.cards.len(), 3);
    assert_eq!(export.attempts.len(), 2);
    assert_eq!(export.statistics.total_attempts, 2);
}

#[tokio::test]
async fn test_real_time_and_unused_cards() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    play(&store, &s1, &[("Ann", 0, true), ("Ann", 1, true), ("Bob", 1, false)]).await;
    fill_deck(&store, s1.id, Difficulty::Hard, 2).await;

    let live = analytics::get_real_time_analytics(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(live.total_attempts, 3);
    assert_eq!(live.total_contestants, 2);
    assert_eq!(live.recent_activity.len(), 3);
    assert_eq!(live.current_success_rate, 66.67);

    // Recording attempts does not mark cards as drawn
    let unused = analytics::get_unused_cards_analytics(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(unused.total_unused, 5);
    assert_eq!(unused.easy.len(), 3);
    assert_eq!(unused.hard.len(), 2);
    assert!(unused.medium.is_empty());
}

#[tokio::test]
async fn test_trends_window_validation() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    play(&store, &s1, &[("Ann", 0, true)]).await;

    let trends = analytics::get_performance_trends(store.as_ref(), s1.id, 7)
        .await
        .unwrap();
    assert_eq!(trends.days, 7);
    assert_eq!(trends.daily.len(), 1);
    assert_eq!(trends.daily[0].attempts, 1);
    assert_eq!(trends.daily[0].unique_contestants, 1);

    let err = analytics::get_performance_trends(store.as_ref(), s1.id, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_trends_only_count_attempts_inside_the_window() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let deck = fill_deck(&store, s1.id, Difficulty::Easy, 1).await;
    let now = Utc::now();

    record_at(&store, &s1, deck[0].id, "Old", true, now - Duration::days(10)).await;
    record_at(&store, &s1, deck[0].id, "Ann", false, now - Duration::days(3)).await;
    record_at(&store, &s1, deck[0].id, "Ann", true, now).await;
    record_at(&store, &s1, deck[0].id, "Bob", true, now).await;

    let trends = analytics::get_performance_trends(store.as_ref(), s1.id, 7)
        .await
        .unwrap();
    assert_eq!(trends.daily.len(), 2);
    assert_eq!(trends.daily[0].date, (now - Duration::days(3)).date_naive());
    assert_eq!(trends.daily[0].attempts, 1);
    assert_eq!(trends.daily[0].success_rate, 0.0);
    assert_eq!(trends.daily[1].date, now.date_naive());
    assert_eq!(trends.daily[1].attempts, 2);
    assert_eq!(trends.daily[1].unique_contestants, 2);
    assert_eq!(trends.trends.attempts_growth, 100.0);
    assert_eq!(trends.trends.success_rate_change, 100.0);
    assert_eq!(trends.trends.contestant_growth, 100.0);

    let wider = analytics::get_performance_trends(store.as_ref(), s1.id, 30)
        .await
        .unwrap();
    assert_eq!(wider.daily.len(), 3);
}

#[tokio::test]
async fn test_activity_and_usage_rankings_are_capped() {
    let store = store();
    let (_, s1) = season(&store, "S1").await;
    let deck = fill_deck(&store, s1.id, Difficulty::Medium, 25).await;
    let start = Utc::now() - Duration::hours(1);

    // Card n is used n times and gets the nth attempt
    for (i, card) in deck.iter().enumerate() {
        for _ in 0..card.card_number {
            store.increment_usage(card.id, None, Utc::now()).await.unwrap();
        }
        record_at(&store, &s1, card.id, "Ann", true, start + Duration::seconds(i as i64)).await;
    }

    let live = analytics::get_real_time_analytics(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(live.total_attempts, 25);
    assert_eq!(live.recent_activity.len(), 20);
    let newest: Vec<i32> = live.recent_activity.iter().map(|a| a.card_number).collect();
    assert_eq!(newest, (6..=25).rev().collect::<Vec<_>>());

    let perf = attempts::get_contestant_performance(store.as_ref(), "Ann", Some(s1.id))
        .await
        .unwrap();
    assert_eq!(perf.total_attempts, 25);
    assert_eq!(perf.recent_attempts.len(), 10);
    assert_eq!(perf.recent_attempts[0].card.card_number, 25);
    assert_eq!(perf.recent_attempts[9].card.card_number, 16);

    let stats = analytics::get_season_statistics(store.as_ref(), s1.id)
        .await
        .unwrap();
    assert_eq!(stats.most_used_cards.len(), 10);
    assert_eq!(stats.most_used_cards[0].usage_count, 25);
    assert_eq!(stats.least_used_cards.len(), 10);
    assert_eq!(stats.least_used_cards[0].usage_count, 1);
}
