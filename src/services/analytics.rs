use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::{
        analytics::{
            CardUsageStat, ExportData, PerformanceTrends, RealTimeAnalytics, SeasonComparison,
            SeasonStatistics, UnusedCardsAnalytics,
        },
        attempt::{AttemptDetail, AttemptFilter, ContestantPerformance},
        card::Card,
        season::Season,
    },
    services::{aggregate, seasons::ensure_season},
};

pub const DEFAULT_TREND_DAYS: u32 = 30;
pub const MAX_TREND_DAYS: u32 = 3650;

struct SeasonRows {
    season: Season,
    cards: Vec<Card>,
    attempts: Vec<AttemptDetail>,
}

async fn load_season(store: &dyn TriviaStore, season_id: Uuid) -> Result<SeasonRows, AppError> {
    let season = ensure_season(store, season_id).await?;
    let cards = store.list_cards(season_id, None).await?;
    let attempts = store
        .find_attempts(&AttemptFilter::season(season_id), None)
        .await?;
    Ok(SeasonRows {
        season,
        cards,
        attempts,
    })
}

pub async fn get_card_usage_statistics(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<Vec<CardUsageStat>, AppError> {
    let rows = load_season(store, season_id)
        .await
        .map_err(AppError::into_analytics)?;
    Ok(aggregate::card_usage_statistics(&rows.cards, &rows.attempts))
}

pub async fn get_contestant_performance_analytics(
    store: &dyn TriviaStore,
    season_id: Option<Uuid>,
) -> Result<Vec<ContestantPerformance>, AppError> {
    let attempts = async {
        if let Some(id) = season_id {
            ensure_season(store, id).await?;
        }
        let filter = AttemptFilter {
            season_id,
            ..Default::default()
        };
        store.find_attempts(&filter, None).await
    }
    .await
    .map_err(AppError::into_analytics)?;

    Ok(aggregate::contestant_rankings(&attempts))
}

pub async fn get_season_statistics(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<SeasonStatistics, AppError> {
    let rows = load_season(store, season_id)
        .await
        .map_err(AppError::into_analytics)?;
    Ok(aggregate::season_statistics(
        &rows.season,
        &rows.cards,
        &rows.attempts,
    ))
}

pub async fn compare_seasons(
    store: &dyn TriviaStore,
    season_ids: &[Uuid],
) -> Result<SeasonComparison, AppError> {
    if season_ids.is_empty() {
        return Err(AppError::BadRequest(
            "At least one season is required for comparison".into(),
        ));
    }

    let mut statistics = Vec::with_capacity(season_ids.len());
    for &season_id in season_ids {
        statistics.push(get_season_statistics(store, season_id).await?);
    }

    Ok(aggregate::compare_seasons(statistics))
}

pub async fn generate_export_data(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<ExportData, AppError> {
    let rows = load_season(store, season_id)
        .await
        .map_err(AppError::into_analytics)?;
    let statistics = aggregate::season_statistics(&rows.season, &rows.cards, &rows.attempts);

    tracing::info!(
        "Prepared export for season {} ({} cards, {} attempts)",
        season_id,
        rows.cards.len(),
        rows.attempts.len()
    );

    Ok(ExportData {
        season: rows.season,
        cards: rows.cards,
        attempts: rows.attempts,
        statistics,
        exported_at: Utc::now(),
    })
}

pub async fn get_real_time_analytics(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<RealTimeAnalytics, AppError> {
    let rows = load_season(store, season_id)
        .await
        .map_err(AppError::into_analytics)?;
    Ok(aggregate::real_time_analytics(&rows.attempts, Utc::now()))
}

pub async fn get_unused_cards_analytics(
    store: &dyn TriviaStore,
    season_id: Uuid,
) -> Result<UnusedCardsAnalytics, AppError> {
    let cards = async {
        ensure_season(store, season_id).await?;
        store.list_cards(season_id, None).await
    }
    .await
    .map_err(AppError::into_analytics)?;

    Ok(aggregate::unused_cards(&cards))
}

pub async fn get_performance_trends(
    store: &dyn TriviaStore,
    season_id: Uuid,
    days: u32,
) -> Result<PerformanceTrends, AppError> {
    if !(1..=MAX_TREND_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {MAX_TREND_DAYS}"
        )));
    }
    let now = Utc::now();

    let attempts = async {
        ensure_season(store, season_id).await?;
        let filter = AttemptFilter {
            season_id: Some(season_id),
            since: Some(now - chrono::Duration::days(days as i64)),
            ..Default::default()
        };
        store.find_attempts(&filter, None).await
    }
    .await
    .map_err(AppError::into_analytics)?;

    Ok(aggregate::performance_trends(season_id, &attempts, days, now))
}
