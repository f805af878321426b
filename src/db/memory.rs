use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    db::TriviaStore,
    errors::AppError,
    models::{
        User,
        attempt::{Attempt, AttemptDetail, AttemptFilter, NewAttempt},
        card::{Card, CardSummary, CardUpdate, DECK_CAPACITY, Difficulty, NewCard},
        pagination::PageRequest,
        season::{NewSeason, Season, SeasonUpdate},
        user::{NewUser, Role},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    seasons: Vec<Season>,
    cards: Vec<Card>,
    attempts: Vec<Attempt>,
}

impl Tables {
    fn detail(&self, attempt: &Attempt) -> Option<AttemptDetail> {
        self.cards
            .iter()
            .find(|c| c.id == attempt.card_id)
            .map(|card| AttemptDetail {
                attempt: attempt.clone(),
                card: CardSummary::from(card),
            })
    }

    fn deck(&self, season_id: Uuid, difficulty: Difficulty) -> impl Iterator<Item = &Card> {
        self.cards
            .iter()
            .filter(move |c| c.season_id == season_id && c.difficulty == difficulty)
    }
}

/// Test double for [`TriviaStore`] that enforces the same constraints as the
/// Postgres schema. Nothing is persisted; the server always runs on `PgStore`.
///
/// `fail_operations` makes every call return a `DatabaseError`, and
/// `simulate_contention` makes the next conditional usage increments lose
/// their race as if another host drew the card first.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
    contended_increments: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[doc(hidden)]
    pub fn fail_operations(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[doc(hidden)]
    pub fn simulate_contention(&self, increments: u32) {
        self.contended_increments.store(increments, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(
                "Simulated storage failure".into(),
            ));
        }
        Ok(())
    }

    fn take_contention(&self) -> bool {
        self.contended_increments
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl TriviaStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::BadRequest(format!(
                "Email '{}' is already registered",
                user.email
            )));
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn list_users(
        &self,
        role: Option<Role>,
        page: PageRequest,
    ) -> Result<(Vec<User>, u64), AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let total = users.len() as u64;
        Ok((page.slice(&users), total))
    }

    async fn update_user_role(&self, user_id: Uuid, role: Role) -> Result<Option<User>, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        Ok(tables.users.iter_mut().find(|u| u.id == user_id).map(|u| {
            u.role = role;
            u.clone()
        }))
    }

    async fn count_users_by_role(&self) -> Result<Vec<(Role, u64)>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(Role::ALL
            .iter()
            .map(|role| {
                let count = tables.users.iter().filter(|u| u.role == *role).count();
                (*role, count as u64)
            })
            .filter(|(_, count)| *count > 0)
            .collect())
    }

    async fn create_season(&self, season: NewSeason) -> Result<Season, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        if tables.seasons.iter().any(|s| s.name == season.name) {
            return Err(AppError::BadRequest(format!(
                "Season with name '{}' already exists",
                season.name
            )));
        }
        let now = Utc::now();
        let created = Season {
            id: Uuid::new_v4(),
            name: season.name,
            description: season.description,
            created_by_id: season.created_by_id,
            created_at: now,
            updated_at: now,
        };
        tables.seasons.push(created.clone());
        Ok(created)
    }

    async fn get_season(&self, season_id: Uuid) -> Result<Option<Season>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.seasons.iter().find(|s| s.id == season_id).cloned())
    }

    async fn find_season_by_name(&self, name: &str) -> Result<Option<Season>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.seasons.iter().find(|s| s.name == name).cloned())
    }

    async fn list_seasons(&self, created_by: Option<Uuid>) -> Result<Vec<Season>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut seasons: Vec<Season> = tables
            .seasons
            .iter()
            .filter(|s| created_by.is_none_or(|id| s.created_by_id == id))
            .cloned()
            .collect();
        seasons.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(seasons)
    }

    async fn update_season(
        &self,
        season_id: Uuid,
        update: SeasonUpdate,
    ) -> Result<Option<Season>, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        if let Some(ref name) = update.name {
            if tables
                .seasons
                .iter()
                .any(|s| s.id != season_id && &s.name == name)
            {
                return Err(AppError::BadRequest(
                    "A season with that name already exists".into(),
                ));
            }
        }
        Ok(tables
            .seasons
            .iter_mut()
            .find(|s| s.id == season_id)
            .map(|s| {
                if let Some(name) = update.name {
                    s.name = name;
                }
                if let Some(description) = update.description {
                    s.description = Some(description);
                }
                s.updated_at = Utc::now();
                s.clone()
            }))
    }

    async fn delete_season(&self, season_id: Uuid) -> Result<bool, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let before = tables.seasons.len();
        tables.seasons.retain(|s| s.id != season_id);
        if tables.seasons.len() == before {
            return Ok(false);
        }
        tables.cards.retain(|c| c.season_id != season_id);
        tables.attempts.retain(|a| a.season_id != season_id);
        Ok(true)
    }

    async fn insert_card(&self, card: NewCard) -> Result<Card, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        if !tables.seasons.iter().any(|s| s.id == card.season_id) {
            return Err(AppError::SeasonNotFound(card.season_id));
        }
        if !(1..=DECK_CAPACITY).contains(&card.card_number) {
            return Err(AppError::BadRequest(format!(
                "Card number must be between 1 and {DECK_CAPACITY}"
            )));
        }
        if tables
            .deck(card.season_id, card.difficulty)
            .any(|c| c.card_number == card.card_number)
        {
            return Err(AppError::DuplicateCardNumber {
                difficulty: card.difficulty,
                card_number: card.card_number,
            });
        }
        let now = Utc::now();
        let created = Card {
            id: Uuid::new_v4(),
            season_id: card.season_id,
            difficulty: card.difficulty,
            card_number: card.card_number,
            question: card.question,
            correct_answer: card.correct_answer,
            usage_count: 0,
            last_used: None,
            created_at: now,
            updated_at: now,
        };
        tables.cards.push(created.clone());
        Ok(created)
    }

    async fn get_card(&self, card_id: Uuid) -> Result<Option<Card>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.cards.iter().find(|c| c.id == card_id).cloned())
    }

    async fn list_cards(
        &self,
        season_id: Uuid,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<Card>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut cards: Vec<Card> = tables
            .cards
            .iter()
            .filter(|c| c.season_id == season_id && difficulty.is_none_or(|d| c.difficulty == d))
            .cloned()
            .collect();
        cards.sort_by_key(|c| (c.difficulty, c.card_number));
        Ok(cards)
    }

    async fn count_cards(&self, season_id: Uuid, difficulty: Difficulty) -> Result<u64, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables.deck(season_id, difficulty).count() as u64)
    }

    async fn card_numbers(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<Vec<i32>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut numbers: Vec<i32> = tables
            .deck(season_id, difficulty)
            .map(|c| c.card_number)
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }

    async fn update_card(
        &self,
        card_id: Uuid,
        update: CardUpdate,
    ) -> Result<Option<Card>, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        Ok(tables.cards.iter_mut().find(|c| c.id == card_id).map(|c| {
            if let Some(question) = update.question {
                c.question = question;
            }
            if let Some(answer) = update.correct_answer {
                c.correct_answer = answer;
            }
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn delete_card(&self, card_id: Uuid) -> Result<bool, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let before = tables.cards.len();
        tables.cards.retain(|c| c.id != card_id);
        if tables.cards.len() == before {
            return Ok(false);
        }
        tables.attempts.retain(|a| a.card_id != card_id);
        Ok(true)
    }

    async fn unused_cards(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<Vec<Card>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut cards: Vec<Card> = tables
            .deck(season_id, difficulty)
            .filter(|c| c.usage_count == 0)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.card_number);
        Ok(cards)
    }

    async fn least_used_cards(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
        window: u32,
    ) -> Result<Vec<Card>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut cards: Vec<Card> = tables.deck(season_id, difficulty).cloned().collect();
        cards.sort_by_key(|c| (c.usage_count, c.card_number));
        let edge = window.max(1) as usize - 1;
        if let Some(ceiling) = cards.get(edge).map(|c| c.usage_count) {
            cards.retain(|c| c.usage_count <= ceiling);
        }
        Ok(cards)
    }

    async fn increment_usage(
        &self,
        card_id: Uuid,
        expected_usage: Option<i32>,
        now: DateTime<Utc>,
    ) -> Result<Option<Card>, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let Some(card) = tables.cards.iter_mut().find(|c| c.id == card_id) else {
            return Ok(None);
        };
        if expected_usage.is_some() && self.take_contention() {
            // Another caller's draw lands first.
            card.usage_count += 1;
            card.last_used = Some(now);
        }
        if expected_usage.is_some_and(|expected| expected != card.usage_count) {
            return Ok(None);
        }
        card.usage_count += 1;
        card.last_used = Some(now);
        card.updated_at = now;
        Ok(Some(card.clone()))
    }

    async fn reset_deck_usage(
        &self,
        season_id: Uuid,
        difficulty: Difficulty,
    ) -> Result<u64, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let mut affected = 0;
        for card in tables
            .cards
            .iter_mut()
            .filter(|c| c.season_id == season_id && c.difficulty == difficulty)
        {
            card.usage_count = 0;
            card.last_used = None;
            card.updated_at = now;
            affected += 1;
        }
        Ok(affected)
    }

    async fn record_attempt(
        &self,
        attempt: NewAttempt,
        now: DateTime<Utc>,
    ) -> Result<Option<Attempt>, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let Some(season_id) = tables
            .cards
            .iter()
            .find(|c| c.id == attempt.card_id)
            .map(|c| c.season_id)
        else {
            return Ok(None);
        };
        let recorded = Attempt {
            id: Uuid::new_v4(),
            card_id: attempt.card_id,
            season_id,
            contestant_name: attempt.contestant_name,
            given_answer: attempt.given_answer,
            is_correct: attempt.is_correct,
            attempted_at: now,
            recorded_by_id: attempt.recorded_by_id,
        };
        tables.attempts.push(recorded.clone());
        Ok(Some(recorded))
    }

    async fn find_attempts(
        &self,
        filter: &AttemptFilter,
        page: Option<PageRequest>,
    ) -> Result<Vec<AttemptDetail>, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        let mut details: Vec<AttemptDetail> = tables
            .attempts
            .iter()
            .filter_map(|a| tables.detail(a))
            .filter(|d| filter.matches(d))
            .collect();
        details.sort_by(|a, b| {
            b.attempt
                .attempted_at
                .cmp(&a.attempt.attempted_at)
                .then(a.attempt.id.cmp(&b.attempt.id))
        });
        Ok(match page {
            Some(page) => page.slice(&details),
            None => details,
        })
    }

    async fn count_attempts(&self, filter: &AttemptFilter) -> Result<u64, AppError> {
        self.check_available()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .attempts
            .iter()
            .filter_map(|a| tables.detail(a))
            .filter(|d| filter.matches(d))
            .count() as u64)
    }

    async fn set_attempt_correctness(
        &self,
        attempt_id: Uuid,
        is_correct: bool,
    ) -> Result<Option<Attempt>, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        Ok(tables
            .attempts
            .iter_mut()
            .find(|a| a.id == attempt_id)
            .map(|a| {
                a.is_correct = is_correct;
                a.clone()
            }))
    }

    async fn delete_attempt(&self, attempt_id: Uuid) -> Result<bool, AppError> {
        self.check_available()?;
        let mut tables = self.tables.lock().await;
        let before = tables.attempts.len();
        tables.attempts.retain(|a| a.id != attempt_id);
        Ok(tables.attempts.len() != before)
    }
}
