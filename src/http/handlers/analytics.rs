use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    http::handlers::attempt::SeasonScope,
    models::{
        analytics::{
            CardUsageStat, ExportData, PerformanceTrends, RealTimeAnalytics, SeasonComparison,
            SeasonStatistics, UnusedCardsAnalytics,
        },
        attempt::ContestantPerformance,
    },
    services::analytics::{self, DEFAULT_TREND_DAYS},
    state::AppState,
};

fn log_failure(what: &str, season_id: Uuid, err: &crate::errors::AppError) {
    tracing::error!("Error computing {} for season {}: {}", what, season_id, err);
}

pub async fn season_card_stats_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Vec<CardUsageStat>>, (StatusCode, String)> {
    analytics::get_card_usage_statistics(state.store.as_ref(), season_id)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("card usage", season_id, &e);
            e.to_response()
        })
}

pub async fn season_contestants_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Vec<ContestantPerformance>>, (StatusCode, String)> {
    analytics::get_contestant_performance_analytics(state.store.as_ref(), Some(season_id))
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("contestant rankings", season_id, &e);
            e.to_response()
        })
}

pub async fn contestant_analytics_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(scope): Query<SeasonScope>,
) -> Result<Json<Vec<ContestantPerformance>>, (StatusCode, String)> {
    analytics::get_contestant_performance_analytics(state.store.as_ref(), scope.season_id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error computing contestant rankings: {}", e);
            e.to_response()
        })
}

pub async fn season_statistics_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<SeasonStatistics>, (StatusCode, String)> {
    analytics::get_season_statistics(state.store.as_ref(), season_id)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("statistics", season_id, &e);
            e.to_response()
        })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparePayload {
    pub season_ids: Vec<Uuid>,
}

pub async fn compare_seasons_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<ComparePayload>,
) -> Result<Json<SeasonComparison>, (StatusCode, String)> {
    analytics::compare_seasons(state.store.as_ref(), &payload.season_ids)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error comparing seasons {:?}: {}", payload.season_ids, e);
            e.to_response()
        })
}

pub async fn export_season_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<ExportData>, (StatusCode, String)> {
    analytics::generate_export_data(state.store.as_ref(), season_id)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("export", season_id, &e);
            e.to_response()
        })
}

pub async fn real_time_analytics_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<RealTimeAnalytics>, (StatusCode, String)> {
    analytics::get_real_time_analytics(state.store.as_ref(), season_id)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("real-time analytics", season_id, &e);
            e.to_response()
        })
}

pub async fn unused_cards_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<UnusedCardsAnalytics>, (StatusCode, String)> {
    analytics::get_unused_cards_analytics(state.store.as_ref(), season_id)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("unused cards", season_id, &e);
            e.to_response()
        })
}

#[derive(Deserialize)]
pub struct TrendQuery {
    pub days: Option<u32>,
}

pub async fn performance_trends_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<PerformanceTrends>, (StatusCode, String)> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);

    analytics::get_performance_trends(state.store.as_ref(), season_id, days)
        .await
        .map(Json)
        .map_err(|e| {
            log_failure("trends", season_id, &e);
            e.to_response()
        })
}
