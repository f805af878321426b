use axum::http::StatusCode;

use crate::{errors::AppError, models::card::Difficulty};

pub mod analytics;
pub mod attempt;
pub mod card;
pub mod health;
pub mod season;
pub mod user;

pub use analytics::{
    compare_seasons_handler, contestant_analytics_handler, export_season_handler,
    performance_trends_handler, real_time_analytics_handler, season_card_stats_handler,
    season_contestants_handler, season_statistics_handler, unused_cards_handler,
};
pub use attempt::{
    contestant_performance_handler, correct_attempt_handler, delete_attempt_handler,
    get_attempts_handler, record_attempt_handler,
};
pub use card::{
    create_card_handler, delete_card_handler, deck_status_handler, draw_card_handler,
    get_card_handler, get_deck_cards_handler, reset_deck_handler, update_card_handler,
};
pub use health::health_handler;
pub use season::{
    create_season_handler, delete_season_handler, get_my_seasons_handler,
    get_season_decks_handler, get_season_handler, get_seasons_handler, update_season_handler,
};
pub use user::{
    create_user_handler, get_role_stats_handler, get_user_handler, get_users_handler,
    update_user_role_handler,
};

pub(crate) fn parse_difficulty(raw: &str) -> Result<Difficulty, (StatusCode, String)> {
    raw.parse::<Difficulty>()
        .map_err(|e| AppError::BadRequest(e).to_response())
}
