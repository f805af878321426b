use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    auth::{AuthUser, MANAGERS, PRESENTERS},
    errors::AppError,
    http::handlers::parse_difficulty,
    models::{
        card::{Card, CardUpdate, CardWithStats, DeckStatus},
        pagination::{PageQuery, Paginated},
    },
    services::{cards, draw},
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCardPayload {
    pub card_number: Option<i32>,
    pub question: String,
    pub correct_answer: String,
}

pub async fn create_card_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((season_id, difficulty)): Path<(Uuid, String)>,
    Json(payload): Json<CreateCardPayload>,
) -> Result<Json<Card>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;
    let difficulty = parse_difficulty(&difficulty)?;
    let store = state.store.as_ref();

    let result = match payload.card_number {
        Some(card_number) => {
            cards::create_card(
                store,
                season_id,
                difficulty,
                card_number,
                &payload.question,
                &payload.correct_answer,
            )
            .await
        }
        None => {
            cards::create_card_with_auto_number(
                store,
                season_id,
                difficulty,
                &payload.question,
                &payload.correct_answer,
            )
            .await
        }
    };

    result.map(Json).map_err(|e| {
        tracing::error!("Error creating card in {} deck of {}: {}", difficulty, season_id, e);
        e.to_response()
    })
}

pub async fn get_deck_cards_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((season_id, difficulty)): Path<(Uuid, String)>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<CardWithStats>>, (StatusCode, String)> {
    let difficulty = parse_difficulty(&difficulty)?;

    cards::get_cards_by_deck(state.store.as_ref(), season_id, difficulty, page.into())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error listing {} deck of {}: {}", difficulty, season_id, e);
            e.to_response()
        })
}

pub async fn deck_status_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((season_id, difficulty)): Path<(Uuid, String)>,
) -> Result<Json<DeckStatus>, (StatusCode, String)> {
    let difficulty = parse_difficulty(&difficulty)?;

    cards::get_deck_status(state.store.as_ref(), season_id, difficulty)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error reading {} deck status of {}: {}", difficulty, season_id, e);
            e.to_response()
        })
}

pub async fn draw_card_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((season_id, difficulty)): Path<(Uuid, String)>,
) -> Result<Json<Card>, (StatusCode, String)> {
    auth.require_role(PRESENTERS)?;
    let difficulty = parse_difficulty(&difficulty)?;

    let mut rng = StdRng::from_os_rng();
    match draw::draw_random_card(state.store.as_ref(), season_id, difficulty, &mut rng).await {
        Ok(card) => Ok(Json(card)),
        Err(err) => {
            tracing::error!("Error drawing from {} deck of {}: {}", difficulty, season_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn reset_deck_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((season_id, difficulty)): Path<(Uuid, String)>,
) -> Result<Json<Value>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;
    let difficulty = parse_difficulty(&difficulty)?;

    let reset = cards::reset_deck_usage(state.store.as_ref(), season_id, difficulty)
        .await
        .map_err(|e| {
            tracing::error!("Error resetting {} deck of {}: {}", difficulty, season_id, e);
            e.to_response()
        })?;

    Ok(Json(json!({ "resetCards": reset })))
}

pub async fn get_card_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Card>, (StatusCode, String)> {
    cards::get_card_by_id(state.store.as_ref(), card_id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error retrieving card {}: {}", card_id, e);
            e.to_response()
        })
}

pub async fn update_card_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(card_id): Path<Uuid>,
    Json(payload): Json<CardUpdate>,
) -> Result<Json<Card>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;

    cards::update_card(state.store.as_ref(), card_id, payload)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error updating card {}: {}", card_id, e);
            e.to_response()
        })
}

pub async fn delete_card_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, String)> {
    auth.require_role(MANAGERS)?;

    match cards::delete_card(state.store.as_ref(), card_id).await {
        Ok(true) => Ok(Json(json!({ "deleted": card_id }))),
        Ok(false) => Err(AppError::CardNotFound(card_id).to_response()),
        Err(err) => {
            tracing::error!("Error deleting card {}: {}", card_id, err);
            Err(err.to_response())
        }
    }
}
