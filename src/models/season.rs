use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::card::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSeason {
    pub name: String,
    pub description: Option<String>,
    pub created_by_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeckCounts {
    pub easy: u64,
    pub medium: u64,
    pub hard: u64,
}

impl DeckCounts {
    pub fn total(&self) -> u64 {
        self.easy + self.medium + self.hard
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonWithStats {
    #[serde(flatten)]
    pub season: Season,
    pub deck_counts: DeckCounts,
    pub total_cards: u64,
    pub total_attempts: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckUsageStats {
    pub difficulty: Difficulty,
    pub card_count: u64,
    pub total_usage: u64,
    pub average_usage: f64,
}
