use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, MANAGERS},
    errors::AppError,
    models::season::{DeckUsageStats, Season, SeasonUpdate, SeasonWithStats},
    services::seasons,
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeasonPayload {
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_season_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateSeasonPayload>,
) -> Result<Json<Season>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;

    match seasons::create_season(
        state.store.as_ref(),
        &payload.name,
        payload.description,
        auth.0.id,
    )
    .await
    {
        Ok(season) => Ok(Json(season)),
        Err(err) => {
            tracing::error!("Error creating season: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_seasons_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<SeasonWithStats>>, (StatusCode, String)> {
    seasons::get_all_seasons_with_stats(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing seasons: {}", e);
            e.to_response()
        })
}

pub async fn get_my_seasons_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SeasonWithStats>>, (StatusCode, String)> {
    seasons::get_seasons_by_user(state.store.as_ref(), auth.0.id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing seasons of {}: {}", auth.0.id, e);
            e.to_response()
        })
}

pub async fn get_season_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<SeasonWithStats>, (StatusCode, String)> {
    let season = seasons::get_season_by_id(state.store.as_ref(), season_id)
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving season {}: {}", season_id, e);
            e.to_response()
        })?;

    Ok(Json(season))
}

pub async fn update_season_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(season_id): Path<Uuid>,
    Json(payload): Json<SeasonUpdate>,
) -> Result<Json<Season>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;

    let season = seasons::update_season(state.store.as_ref(), season_id, payload)
        .await
        .map_err(|e| {
            tracing::error!("Error updating season {}: {}", season_id, e);
            e.to_response()
        })?;

    Ok(Json(season))
}

pub async fn delete_season_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;

    match seasons::delete_season(state.store.as_ref(), season_id).await {
        Ok(true) => Ok(Json(json!({ "deleted": season_id }))),
        Ok(false) => Err(AppError::SeasonNotFound(season_id).to_response()),
        Err(err) => {
            tracing::error!("Error deleting season {}: {}", season_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn get_season_decks_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(season_id): Path<Uuid>,
) -> Result<Json<Vec<DeckUsageStats>>, (StatusCode, String)> {
    seasons::get_season_deck_stats(state.store.as_ref(), season_id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error computing deck stats for {}: {}", season_id, e);
            e.to_response()
        })
}
