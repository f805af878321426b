pub mod attempt;
pub mod card;
pub mod memory;
pub mod season;
pub mod user;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        User,
        attempt::{Attempt, AttemptDetail, AttemptFilter, NewAttempt},
        card::{Card, CardUpdate, Difficulty, NewCard},
        pagination::PageRequest,
        season::{NewSeason, Season, SeasonUpdate},
        user::{NewUser, Role},
    },
};

pub use memory::MemoryStore;

/// Persistence operations the services run against.
///
/// Implementations enforce the schema constraints themselves: unique card
/// numbers per deck, card numbers within 1..=52, and cascading deletes from
/// seasons to cards to attempts.
#[async_trait]
pub trait TriviaStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError>;
    async fn list_users(
        &self,
        role: Option<Role>,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), AppError>;
    async fn update_user_role(&self, user_id: Uuid, role: Role) -> Result<Option<User>, AppError>;
    async fn count_users_by_role(&self) -> Result<Vec<(Role, u64)>, AppError>;

    async fn create_season(&self, season: NewSeason) -> Result<Season, AppError>;
    async fn get_season(&self, season_id: Uuid) -> Result<Option<Season>, AppError>;
    async fn find_season_by_name(&self, name: &str) -> Result<Option<Season>, AppError>;
    async fn list_seasons(&self, created_by: Option<Uuid>) -> Result<Vec<Season>, AppError>;
    async fn update_season(
        &self,
        season_id: Uuid,
        update: SeasonUpdate,
    ) -> Result<Option<Season>, AppError>;
    async fn delete_season(&self, season_id: Uuid) -> Result<bool, AppError>;

    async fn insert_card(&self, card: NewCard) -> Result<Card, AppError>;
    async fn get_card(&self, card_id: Uuid) -> Result<Option<Card>, AppError>;
    async fn list_cards(
        &self,
        season_id: Uuid,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<Card>, AppError>;
    async fn count_cards(&self, season_id: Uuid, difficulty: Difficulty) -> Result<u64, AppError>;
    async fn card_numbers(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<Vec<i32>, AppError>;
    async fn update_card(&self, card_id: Uuid, update: CardUpdate)
    -> Result<Option<Card>, AppError>;
    async fn delete_card(&self, card_id: Uuid) -> Result<bool, AppError>;
    async fn unused_cards(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<Vec<Card>, AppError>;
    /// Cards whose usage is at or below the `window`-th lowest usage in the
    /// deck, lowest first. Every card tied at the boundary is included.
    async fn least_used_cards(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
        window: u32,
    ) -> Result<Vec<Card>, AppError>;
    /// Atomic increment-and-fetch. Returns `None` if the card is gone or,
    /// when `expected_usage` is given, its usage count no longer matches.
    async fn increment_usage(
        &self,
        card_id: Uuid,
        expected_usage: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Option<Card>, AppError>;
    async fn reset_deck_usage(&self, season_id: Uuid, difficulty: Difficulty)
    -> Result<u64, AppError>;

    /// Returns `None` when the referenced card does not exist.
    async fn record_attempt(
        &self,
        attempt: NewAttempt,
        now: DateTime<Utc>,
    ) -> Result<Option<Attempt>, AppError>;
    /// Newest first.
    async fn find_attempts(
        &self,
        filter: &AttemptFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<AttemptDetail>, AppError>;
    async fn count_attempts(&self, filter: &AttemptFilter) -> Result<u64, AppError>;
    async fn set_attempt_correctness(
        &self,
        attempt_id: Uuid,
        is_correct: bool,
    ) -> Result<Option<Attempt>, AppError>;
    async fn delete_attempt(&self, attempt_id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgStore {
    postgres: PgPool,
}

impl PgStore {
    pub fn new(postgres: PgPool) -> Self {
        Self { postgres }
    }
}

#[async_trait]
impl TriviaStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        user::create_user(user, &self.postgres).await
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        user::get_user_by_id(user_id, &self.postgres).await
    }

    async fn list_users(
        &self,
        role: Option<Role>,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), AppError> {
        user::get_users(role, page, &self.postgres).await
    }

    async fn update_user_role(&self, user_id: Uuid, role: Role) -> Result<Option<User>, AppError> {
        user::update_user_role(user_id, role, &self.postgres).await
    }

    async fn count_users_by_role(&self) -> Result<Vec<(Role, u64)>, AppError> {
        user::count_users_by_role(&self.postgres).await
    }

    async fn create_season(&self, new_season: NewSeason) -> Result<Season, AppError> {
        season::create_season(new_season, &self.postgres).await
    }

    async fn get_season(&self, season_id: Uuid) -> Result<Option<Season>, AppError> {
        season::get_season_by_id(season_id, &self.postgres).await
    }

    async fn find_season_by_name(&self, name: &str) -> Result<Option<Season>, AppError> {
        season::get_season_by_name(name, &self.postgres).await
    }

    async fn list_seasons(&self, created_by: Option<Uuid>) -> Result<Vec<Season>, AppError> {
        season::get_seasons(created_by, &self.postgres).await
    }

    async fn update_season(
        &self,
        season_id: Uuid,
        update: SeasonUpdate,
    ) -> Result<Option<Season>, AppError> {
        season::update_season(season_id, update, &self.postgres).await
    }

    async fn delete_season(&self, season_id: Uuid) -> Result<bool, AppError> {
        season::delete_season(season_id, &self.postgres).await
    }

    async fn insert_card(&self, new_card: NewCard) -> Result<Card, AppError> {
        card::create_card(new_card, &self.postgres).await
    }

    async fn get_card(&self, card_id: Uuid) -> Result<Option<Card>, AppError> {
        card::get_card_by_id(card_id, &self.postgres).await
    }

    async fn list_cards(
        &self,
        season_id: Uuid,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<Card>, AppError> {
        card::get_cards(season_id, difficulty, &self.postgres).await
    }

    async fn count_cards(&self, season_id: Uuid, difficulty: Difficulty) -> Result<u64, AppError> {
        card::count_cards(season_id, difficulty, &self.postgres).await
    }

    async fn card_numbers(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<Vec<i32>, AppError> {
        card::get_card_numbers(season_id, difficulty, &self.postgres).await
    }

    async fn update_card(
        &self,
        card_id: Uuid,
        update: CardUpdate,
    ) -> Result<Option<Card>, AppError> {
        card::update_card(card_id, update, &self.postgres).await
    }

    async fn delete_card(&self, card_id: Uuid) -> Result<bool, AppError> {
        card::delete_card(card_id, &self.postgres).await
    }

    async fn unused_cards(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<Vec<Card>, AppError> {
        card::get_unused_cards(season_id, difficulty, &self.postgres).await
    }

    async fn least_used_cards(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
        window: u32,
    ) -> Result<Vec<Card>, AppError> {
        card::get_least_used_cards(season_id, difficulty, window, &self.postgres).await
    }

    async fn increment_usage(
        &self,
        card_id: Uuid,
        expected_usage: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Option<Card>, AppError> {
        card::increment_usage(card_id, expected_usage, now, &self.postgres).await
    }

    async fn reset_deck_usage(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<u64, AppError> {
        card::reset_deck_usage(season_id, difficulty, &self.postgres).await
    }

    async fn record_attempt(
        &self,
        new_attempt: NewAttempt,
        now: DateTime<Utc>,
    ) -> Result<Option<Attempt>, AppError> {
        attempt::record_attempt(new_attempt, now, &self.postgres).await
    }

    async fn find_attempts(
        &self,
        filter: &AttemptFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<AttemptDetail>, AppError> {
        attempt::get_attempts(filter, page, &self.postgres).await
    }

    async fn count_attempts(&self, filter: &AttemptFilter) -> Result<u64, AppError> {
        attempt::count_attempts(filter, &self.postgres).await
    }

    async fn set_attempt_correctness(
        &self,
        attempt_id: Uuid,
        is_correct: bool,
    ) -> Result<Option<Attempt>, AppError> {
        attempt::set_attempt_correctness(attempt_id, is_correct, &self.postgres).await
    }

    async fn delete_attempt(&self, attempt_id: Uuid) -> Result<bool, AppError> {
        attempt::delete_attempt(attempt_id, &self.postgres).await
    }
}
