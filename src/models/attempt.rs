use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::card::{CardSummary, Difficulty};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub id: Uuid,
    pub card_id: Uuid,
    pub season_id: Uuid,
    pub contestant_name: String,
    pub given_answer: String,
    pub is_correct: bool,
    pub attempted_at: DateTime<Utc>,
    pub recorded_by_id: Uuid,
}

/// An attempt together with the card it was answered against.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub attempt: Attempt,
    #[sqlx(flatten)]
    pub card: CardSummary,
}

#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub card_id: Uuid,
    pub contestant_name: String,
    pub given_answer: String,
    pub is_correct: bool,
    pub recorded_by_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptFilter {
    pub season_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    /// Case-insensitive substring match.
    pub contestant_name: Option<String>,
    /// Exact match, used by contestant performance lookups.
    #[serde(skip)]
    pub exact_contestant: Option<String>,
    #[serde(skip)]
    pub since: Option<DateTime<Utc>>,
}

impl AttemptFilter {
    pub fn season(season_id: Uuid) -> Self {
        Self {
            season_id: Some(season_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, detail: &AttemptDetail) -> bool {
        let attempt = &detail.attempt;
        if self.season_id.is_some_and(|id| id != attempt.season_id) {
            return false;
        }
        if self.card_id.is_some_and(|id| id != attempt.card_id) {
            return false;
        }
        if let Some(ref needle) = self.contestant_name {
            if !attempt
                .contestant_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(ref name) = self.exact_contestant {
            if &attempt.contestant_name != name {
                return false;
            }
        }
        if self.since.is_some_and(|since| attempt.attempted_at < since) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyPerformance {
    pub attempts: u64,
    pub correct: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyBreakdown {
    pub easy: DifficultyPerformance,
    pub medium: DifficultyPerformance,
    pub hard: DifficultyPerformance,
}

impl DifficultyBreakdown {
    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyPerformance {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> &DifficultyPerformance {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContestantPerformance {
    pub contestant_name: String,
    pub total_attempts: u64,
    pub correct_attempts: u64,
    pub success_rate: f64,
    pub difficulty_breakdown: DifficultyBreakdown,
    pub recent_attempts: Vec<AttemptDetail>,
}
