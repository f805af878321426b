use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    attempt::{AttemptDetail, DifficultyBreakdown},
    card::{Card, Difficulty},
    season::Season,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardUsageStat {
    pub card_id: Uuid,
    pub card_number: i32,
    pub difficulty: Difficulty,
    pub question: String,
    pub usage_count: i32,
    pub total_attempts: u64,
    pub correct_attempts: u64,
    pub success_rate: f64,
    pub last_used: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyStat {
    pub difficulty: Difficulty,
    pub card_count: u64,
    pub attempt_count: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonStatistics {
    pub season_id: Uuid,
    pub season_name: String,
    pub total_cards: u64,
    pub total_attempts: u64,
    pub overall_success_rate: f64,
    pub difficulty_stats: Vec<DifficultyStat>,
    pub most_used_cards: Vec<CardUsageStat>,
    pub least_used_cards: Vec<CardUsageStat>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    pub season_id: Uuid,
    pub season_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRankEntry {
    pub season_id: Uuid,
    pub season_name: String,
    pub card_count: u64,
    pub attempt_count: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyRanking {
    pub difficulty: Difficulty,
    pub rankings: Vec<DifficultyRankEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonComparison {
    pub seasons: Vec<SeasonStatistics>,
    pub by_total_cards: Vec<ComparisonEntry>,
    pub by_total_attempts: Vec<ComparisonEntry>,
    pub by_success_rate: Vec<ComparisonEntry>,
    pub difficulty_rankings: Vec<DifficultyRanking>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub season: Season,
    pub cards: Vec<Card>,
    pub attempts: Vec<AttemptDetail>,
    pub statistics: SeasonStatistics,
    pub exported_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub contestant_name: String,
    pub card_number: i32,
    pub difficulty: Difficulty,
    pub is_correct: bool,
    pub attempted_at: DateTime<Utc>,
}

impl From<&AttemptDetail> for ActivityEntry {
    fn from(detail: &AttemptDetail) -> Self {
        Self {
            contestant_name: detail.attempt.contestant_name.clone(),
            card_number: detail.card.card_number,
            difficulty: detail.card.difficulty,
            is_correct: detail.attempt.is_correct,
            attempted_at: detail.attempt.attempted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealTimeAnalytics {
    pub last_updated: DateTime<Utc>,
    pub total_attempts: u64,
    pub total_contestants: u64,
    pub recent_activity: Vec<ActivityEntry>,
    pub current_success_rate: f64,
    pub difficulty_breakdown: DifficultyBreakdown,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedCardsAnalytics {
    pub total_unused: u64,
    pub easy: Vec<Card>,
    pub medium: Vec<Card>,
    pub hard: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPerformance {
    pub date: NaiveDate,
    pub attempts: u64,
    pub success_rate: f64,
    pub unique_contestants: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub attempts_growth: f64,
    pub success_rate_change: f64,
    pub contestant_growth: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTrends {
    pub season_id: Uuid,
    pub days: u32,
    pub daily: Vec<DailyPerformance>,
    pub trends: TrendAnalysis,
}
