use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};

use crate::{
    http::handlers::*,
    middleware::{create_auth_rate_limiter, rate_limit_middleware},
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    let auth_rate_limiter = create_auth_rate_limiter();

    Router::new()
        .route("/health", get(health_handler))
        // users, registration is limited separately
        .route(
            "/users",
            post(create_user_handler)
                .route_layer(axum_middleware::from_fn(move |req, next| {
                    rate_limit_middleware(auth_rate_limiter.clone(), req, next)
                }))
                .get(get_users_handler),
        )
        .route("/users/stats/roles", get(get_role_stats_handler))
        .route("/users/{id}", get(get_user_handler))
        .route("/users/{id}/role", patch(update_user_role_handler))
        // seasons
        .route(
            "/seasons",
            post(create_season_handler).get(get_seasons_handler),
        )
        .route("/seasons/mine", get(get_my_seasons_handler))
        .route(
            "/seasons/{id}",
            get(get_season_handler)
                .patch(update_season_handler)
                .delete(delete_season_handler),
        )
        .route("/seasons/{id}/decks", get(get_season_decks_handler))
        // decks and cards
        .route(
            "/seasons/{id}/decks/{difficulty}/cards",
            post(create_card_handler).get(get_deck_cards_handler),
        )
        .route(
            "/seasons/{id}/decks/{difficulty}/status",
            get(deck_status_handler),
        )
        .route(
            "/seasons/{id}/decks/{difficulty}/draw",
            post(draw_card_handler),
        )
        .route(
            "/seasons/{id}/decks/{difficulty}/reset",
            post(reset_deck_handler),
        )
        .route(
            "/cards/{id}",
            get(get_card_handler)
                .patch(update_card_handler)
                .delete(delete_card_handler),
        )
        // attempts
        .route(
            "/attempts",
            post(record_attempt_handler).get(get_attempts_handler),
        )
        .route(
            "/attempts/{id}",
            patch(correct_attempt_handler).delete(delete_attempt_handler),
        )
        .route(
            "/contestants/{name}/performance",
            get(contestant_performance_handler),
        )
        // analytics
        .route("/analytics/contestants", get(contestant_analytics_handler))
        .route("/analytics/compare", post(compare_seasons_handler))
        .route(
            "/analytics/seasons/{id}/cards",
            get(season_card_stats_handler),
        )
        .route(
            "/analytics/seasons/{id}/contestants",
            get(season_contestants_handler),
        )
        .route(
            "/analytics/seasons/{id}/statistics",
            get(season_statistics_handler),
        )
        .route(
            "/analytics/seasons/{id}/export",
            get(export_season_handler),
        )
        .route(
            "/analytics/seasons/{id}/realtime",
            get(real_time_analytics_handler),
        )
        .route(
            "/analytics/seasons/{id}/unused",
            get(unused_cards_handler),
        )
        .route(
            "/analytics/seasons/{id}/trends",
            get(performance_trends_handler),
        )
        .with_state(state)
}
