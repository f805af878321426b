use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    auth::{ADMINS, AuthUser, PRESENTERS},
    errors::AppError,
    models::{
        attempt::{Attempt, AttemptDetail, AttemptFilter, ContestantPerformance},
        pagination::{PageQuery, Paginated},
    },
    services::attempts,
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAttemptPayload {
    pub card_id: Uuid,
    pub contestant_name: String,
    pub given_answer: String,
    pub is_correct: Option<bool>,
}

pub async fn record_attempt_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordAttemptPayload>,
) -> Result<Json<Attempt>, (StatusCode, String)> {
    auth.require_role(PRESENTERS)?;
    let store = state.store.as_ref();

    let result = match payload.is_correct {
        Some(is_correct) => {
            attempts::record_attempt(
                store,
                payload.card_id,
                &payload.contestant_name,
                &payload.given_answer,
                is_correct,
                auth.0.id,
            )
            .await
        }
        None => {
            attempts::record_attempt_with_validation(
                store,
                payload.card_id,
                &payload.contestant_name,
                &payload.given_answer,
                auth.0.id,
            )
            .await
        }
    };

    match result {
        Ok(attempt) => Ok(Json(attempt)),
        Err(err) => {
            tracing::error!("Error recording attempt on card {}: {}", payload.card_id, err);
            Err(err.to_response())
        }
    }
}

pub async fn get_attempts_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(filter): Query<AttemptFilter>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<AttemptDetail>>, (StatusCode, String)> {
    attempts::get_attempt_history(state.store.as_ref(), filter, page.into())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error reading attempt history: {}", e);
            e.to_response()
        })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonScope {
    pub season_id: Option<Uuid>,
}

pub async fn contestant_performance_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(contestant_name): Path<String>,
    Query(scope): Query<SeasonScope>,
) -> Result<Json<ContestantPerformance>, (StatusCode, String)> {
    attempts::get_contestant_performance(state.store.as_ref(), &contestant_name, scope.season_id)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error reading performance of '{}': {}", contestant_name, e);
            e.to_response()
        })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectAttemptPayload {
    pub is_correct: bool,
}

pub async fn correct_attempt_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(attempt_id): Path<Uuid>,
    Json(payload): Json<CorrectAttemptPayload>,
) -> Result<Json<Attempt>, (StatusCode, String)> {
    auth.require_role(ADMINS)?;

    attempts::correct_attempt(state.store.as_ref(), attempt_id, payload.is_correct)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error correcting attempt {}: {}", attempt_id, e);
            e.to_response()
        })
}

pub async fn delete_attempt_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(attempt_id): Path<Uuid>,
) -> Result<Json<Value>, (StatusCode, String)> {
    auth.require_role(ADMINS)?;

    match attempts::delete_attempt(state.store.as_ref(), attempt_id).await {
        Ok(true) => Ok(Json(json!({ "deleted": attempt_id }))),
        Ok(false) => Err(AppError::AttemptNotFound(attempt_id).to_response()),
        Err(err) => {
            tracing::error!("Error deleting attempt {}: {}", attempt_id, err);
            Err(err.to_response())
        }
    }
}
