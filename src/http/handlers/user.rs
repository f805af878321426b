use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    auth::{ADMINS, AuthUser, generate_jwt},
    models::{
        User,
        pagination::{PageQuery, Paginated},
        user::{Role, RoleStats},
    },
    services::users,
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub token: String,
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<Json<CreatedUser>, (StatusCode, String)> {
    let user = users::create_user(state.store.as_ref(), &payload.name, &payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Error creating user: {}", e);
            e.to_response()
        })?;

    let token = generate_jwt(
        &user,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )
    .map_err(|e| {
        tracing::error!("Error signing token for {}: {}", user.id, e);
        e.to_response()
    })?;

    Ok(Json(CreatedUser { user, token }))
}

#[derive(Deserialize)]
pub struct RoleQuery {
    pub role: Option<Role>,
}

pub async fn get_users_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<RoleQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<User>>, (StatusCode, String)> {
    auth.require_role(ADMINS)?;

    match users::get_users(state.store.as_ref(), filter.role, page.into()).await {
        Ok(users) => Ok(Json(users)),
        Err(err) => {
            tracing::error!("Error listing users: {}", err);
            Err(err.to_response())
        }
    }
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, (StatusCode, String)> {
    let user = users::get_user_by_id(state.store.as_ref(), user_id)
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving user: {}", e);
            e.to_response()
        })?;

    Ok(Json(user))
}

#[derive(Deserialize)]
pub struct UpdateRolePayload {
    pub role: Role,
}

pub async fn update_user_role_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<User>, (StatusCode, String)> {
    auth.require_role(ADMINS)?;

    let user = users::update_user_role(state.store.as_ref(), auth.0.id, user_id, payload.role)
        .await
        .map_err(|e| {
            tracing::error!("Error updating role of user {}: {}", user_id, e);
            e.to_response()
        })?;

    Ok(Json(user))
}

pub async fn get_role_stats_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RoleStats>, (StatusCode, String)> {
    auth.require_role(ADMINS)?;

    users::get_role_stats(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!("Error counting roles: {}", e);
            e.to_response()
        })
}
