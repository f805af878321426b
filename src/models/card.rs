use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Maximum number of cards a single (season, difficulty) deck may hold.
pub const DECK_CAPACITY: i32 = 52;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "difficulty", rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub season_id: Uuid,
    pub difficulty: Difficulty,
    pub card_number: i32,
    pub question: String,
    pub correct_answer: String,
    pub usage_count: i32,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub season_id: Uuid,
    pub difficulty: Difficulty,
    pub card_number: i32,
    pub question: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    pub question: Option<String>,
    pub correct_answer: Option<String>,
}

impl CardUpdate {
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.correct_answer.is_none()
    }
}

/// A card annotated with the attempts recorded against it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardWithStats {
    #[serde(flatten)]
    pub card: Card,
    pub total_attempts: u64,
    pub correct_attempts: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeckStatus {
    pub total_cards: u64,
    pub used_cards: u64,
    pub available_cards: u64,
    pub usage_percentage: f64,
}

/// Short card context joined onto attempts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub card_number: i32,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: String,
}

impl From<&Card> for CardSummary {
    fn from(card: &Card) -> Self {
        Self {
            card_number: card.card_number,
            difficulty: card.difficulty,
            question: card.question.clone(),
            correct_answer: card.correct_answer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_any_case() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_serializes_uppercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");
    }
}
