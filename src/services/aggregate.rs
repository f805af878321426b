//! Pure folds over rows already loaded from the store.
//!
//! Everything here is deterministic given its inputs, so the async services
//! only fetch and delegate. Rates are percentages rounded to two decimals and
//! are `0.0` whenever the denominator is zero.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap, HashSet},
};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    analytics::{
        ActivityEntry, CardUsageStat, ComparisonEntry, DailyPerformance, DifficultyRankEntry,
        DifficultyRanking, DifficultyStat, PerformanceTrends, RealTimeAnalytics, SeasonComparison,
        SeasonStatistics, TrendAnalysis, UnusedCardsAnalytics,
    },
    attempt::{AttemptDetail, ContestantPerformance, DifficultyBreakdown},
    card::{Card, CardWithStats, DeckStatus, Difficulty},
    season::{DeckCounts, DeckUsageStats, Season},
};

pub const RECENT_ATTEMPTS: usize = 10;
pub const RECENT_ACTIVITY: usize = 20;
pub const USAGE_RANKING_SIZE: usize = 10;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn success_rate(correct: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(correct as f64 / total as f64 * 100.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    round2((to - from) / from * 100.0)
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// (total, correct) attempt counts keyed by card id.
pub fn attempt_totals_by_card(attempts: &[AttemptDetail]) -> HashMap<Uuid, (u64, u64)> {
    let mut totals: HashMap<Uuid, (u64, u64)> = HashMap::new();
    for detail in attempts {
        let entry = totals.entry(detail.attempt.card_id).or_default();
        entry.0 += 1;
        if detail.attempt.is_correct {
            entry.1 += 1;
        }
    }
    totals
}

pub fn cards_with_stats(cards: &[Card], attempts: &[AttemptDetail]) -> Vec<CardWithStats> {
    let totals = attempt_totals_by_card(attempts);
    cards
        .iter()
        .map(|card| {
            let (total, correct) = totals.get(&card.id).copied().unwrap_or_default();
            CardWithStats {
                card: card.clone(),
                total_attempts: total,
                correct_attempts: correct,
                success_rate: success_rate(correct, total),
            }
        })
        .collect()
}

pub fn deck_status(cards: &[Card]) -> DeckStatus {
    let total_cards = cards.len() as u64;
    let used_cards = cards.iter().filter(|c| c.usage_count > 0).count() as u64;
    let usage_percentage = if total_cards == 0 {
        0.0
    } else {
        round2(used_cards as f64 / total_cards as f64 * 100.0)
    };

    DeckStatus {
        total_cards,
        used_cards,
        available_cards: total_cards - used_cards,
        usage_percentage,
    }
}

pub fn deck_counts(cards: &[Card]) -> DeckCounts {
    let count = |d: Difficulty| cards.iter().filter(|c| c.difficulty == d).count() as u64;
    DeckCounts {
        easy: count(Difficulty::Easy),
        medium: count(Difficulty::Medium),
        hard: count(Difficulty::Hard),
    }
}

pub fn deck_usage_stats(cards: &[Card]) -> Vec<DeckUsageStats> {
    Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            let deck: Vec<&Card> = cards.iter().filter(|c| c.difficulty == difficulty).collect();
            let card_count = deck.len() as u64;
            let total_usage: u64 = deck.iter().map(|c| c.usage_count.max(0) as u64).sum();
            let average_usage = if card_count == 0 {
                0.0
            } else {
                round2(total_usage as f64 / card_count as f64)
            };
            DeckUsageStats {
                difficulty,
                card_count,
                total_usage,
                average_usage,
            }
        })
        .collect()
}

pub fn difficulty_breakdown(attempts: &[AttemptDetail]) -> DifficultyBreakdown {
    let mut breakdown = DifficultyBreakdown::default();
    for detail in attempts {
        let slot = breakdown.get_mut(detail.card.difficulty);
        slot.attempts += 1;
        if detail.attempt.is_correct {
            slot.correct += 1;
        }
    }
    for difficulty in Difficulty::ALL {
        let slot = breakdown.get_mut(difficulty);
        slot.success_rate = success_rate(slot.correct, slot.attempts);
    }
    breakdown
}

/// `attempts` must already be newest first.
pub fn contestant_performance(name: &str, attempts: &[AttemptDetail]) -> ContestantPerformance {
    let total_attempts = attempts.len() as u64;
    let correct_attempts = attempts.iter().filter(|d| d.attempt.is_correct).count() as u64;

    ContestantPerformance {
        contestant_name: name.to_string(),
        total_attempts,
        correct_attempts,
        success_rate: success_rate(correct_attempts, total_attempts),
        difficulty_breakdown: difficulty_breakdown(attempts),
        recent_attempts: attempts.iter().take(RECENT_ATTEMPTS).cloned().collect(),
    }
}

/// One entry per contestant, best success rate first, then most attempts.
pub fn contestant_rankings(attempts: &[AttemptDetail]) -> Vec<ContestantPerformance> {
    let mut grouped: BTreeMap<&str, Vec<AttemptDetail>> = BTreeMap::new();
    for detail in attempts {
        grouped
            .entry(detail.attempt.contestant_name.as_str())
            .or_default()
            .push(detail.clone());
    }

    let mut rankings: Vec<ContestantPerformance> = grouped
        .into_iter()
        .map(|(name, attempts)| contestant_performance(name, &attempts))
        .collect();

    rankings.sort_by(|a, b| {
        desc(a.success_rate, b.success_rate)
            .then(b.total_attempts.cmp(&a.total_attempts))
            .then(a.contestant_name.cmp(&b.contestant_name))
    });
    rankings
}

pub fn card_usage_statistics(cards: &[Card], attempts: &[AttemptDetail]) -> Vec<CardUsageStat> {
    let totals = attempt_totals_by_card(attempts);
    cards
        .iter()
        .map(|card| {
            let (total, correct) = totals.get(&card.id).copied().unwrap_or_default();
            CardUsageStat {
                card_id: card.id,
                card_number: card.card_number,
                difficulty: card.difficulty,
                question: card.question.clone(),
                usage_count: card.usage_count,
                total_attempts: total,
                correct_attempts: correct,
                success_rate: success_rate(correct, total),
                last_used: card.last_used,
            }
        })
        .collect()
}

pub fn season_statistics(
    season: &Season,
    cards: &[Card],
    attempts: &[AttemptDetail],
) -> SeasonStatistics {
    let total_attempts = attempts.len() as u64;
    let correct = attempts.iter().filter(|d| d.attempt.is_correct).count() as u64;
    let breakdown = difficulty_breakdown(attempts);

    let difficulty_stats = Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            let performance = breakdown.get(difficulty);
            DifficultyStat {
                difficulty,
                card_count: cards.iter().filter(|c| c.difficulty == difficulty).count() as u64,
                attempt_count: performance.attempts,
                success_rate: performance.success_rate,
            }
        })
        .collect();

    let mut by_usage = card_usage_statistics(cards, attempts);
    by_usage.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    let most_used_cards = by_usage.iter().take(USAGE_RANKING_SIZE).cloned().collect();
    let least_used_cards = by_usage.iter().rev().take(USAGE_RANKING_SIZE).cloned().collect();

    SeasonStatistics {
        season_id: season.id,
        season_name: season.name.clone(),
        total_cards: cards.len() as u64,
        total_attempts,
        overall_success_rate: success_rate(correct, total_attempts),
        difficulty_stats,
        most_used_cards,
        least_used_cards,
    }
}

pub fn compare_seasons(seasons: Vec<SeasonStatistics>) -> SeasonComparison {
    let ranked = |value: fn(&SeasonStatistics) -> f64| {
        let mut entries: Vec<ComparisonEntry> = seasons
            .iter()
            .map(|s| ComparisonEntry {
                season_id: s.season_id,
                season_name: s.season_name.clone(),
                value: value(s),
            })
            .collect();
        entries.sort_by(|a, b| desc(a.value, b.value));
        entries
    };

    let by_total_cards = ranked(|s| s.total_cards as f64);
    let by_total_attempts = ranked(|s| s.total_attempts as f64);
    let by_success_rate = ranked(|s| s.overall_success_rate);

    let difficulty_rankings = Difficulty::ALL
        .iter()
        .map(|&difficulty| {
            let mut rankings: Vec<DifficultyRankEntry> = seasons
                .iter()
                .filter_map(|s| {
                    s.difficulty_stats
                        .iter()
                        .find(|d| d.difficulty == difficulty)
                        .map(|d| DifficultyRankEntry {
                            season_id: s.season_id,
                            season_name: s.season_name.clone(),
                            card_count: d.card_count,
                            attempt_count: d.attempt_count,
                            success_rate: d.success_rate,
                        })
                })
                .collect();
            rankings.sort_by(|a, b| desc(a.success_rate, b.success_rate));
            DifficultyRanking {
                difficulty,
                rankings,
            }
        })
        .collect();

    SeasonComparison {
        seasons,
        by_total_cards,
        by_total_attempts,
        by_success_rate,
        difficulty_rankings,
    }
}

/// `attempts` must already be newest first.
pub fn real_time_analytics(attempts: &[AttemptDetail], now: DateTime<Utc>) -> RealTimeAnalytics {
    let total_attempts = attempts.len() as u64;
    let correct = attempts.iter().filter(|d| d.attempt.is_correct).count() as u64;
    let contestants: HashSet<&str> = attempts
        .iter()
        .map(|d| d.attempt.contestant_name.as_str())
        .collect();

    RealTimeAnalytics {
        last_updated: now,
        total_attempts,
        total_contestants: contestants.len() as u64,
        recent_activity: attempts
            .iter()
            .take(RECENT_ACTIVITY)
            .map(ActivityEntry::from)
            .collect(),
        current_success_rate: success_rate(correct, total_attempts),
        difficulty_breakdown: difficulty_breakdown(attempts),
    }
}

pub fn unused_cards(cards: &[Card]) -> UnusedCardsAnalytics {
    let mut unused = UnusedCardsAnalytics::default();
    for card in cards.iter().filter(|c| c.usage_count == 0) {
        unused.total_unused += 1;
        match card.difficulty {
            Difficulty::Easy => unused.easy.push(card.clone()),
            Difficulty::Medium => unused.medium.push(card.clone()),
            Difficulty::Hard => unused.hard.push(card.clone()),
        }
    }
    unused
}

/// Days with at least one attempt inside the trailing window, oldest first.
pub fn daily_performance(
    attempts: &[AttemptDetail],
    days: u32,
    now: DateTime<Utc>,
) -> Vec<DailyPerformance> {
    let since = now - Duration::days(days as i64);
    let mut buckets: BTreeMap<NaiveDate, (u64, u64, HashSet<&str>)> = BTreeMap::new();

    for detail in attempts
        .iter()
        .filter(|d| d.attempt.attempted_at >= since && d.attempt.attempted_at <= now)
    {
        let bucket = buckets
            .entry(detail.attempt.attempted_at.date_naive())
            .or_default();
        bucket.0 += 1;
        if detail.attempt.is_correct {
            bucket.1 += 1;
        }
        bucket.2.insert(detail.attempt.contestant_name.as_str());
    }

    buckets
        .into_iter()
        .map(|(date, (attempts, correct, contestants))| DailyPerformance {
            date,
            attempts,
            success_rate: success_rate(correct, attempts),
            unique_contestants: contestants.len() as u64,
        })
        .collect()
}

/// Compares the mean of the first half of the series against the second.
pub fn trend_analysis(daily: &[DailyPerformance]) -> TrendAnalysis {
    let mid = daily.len() / 2;
    let (first, second) = daily.split_at(mid);
    if first.is_empty() || second.is_empty() {
        return TrendAnalysis::default();
    }

    let attempts = |half: &[DailyPerformance]| mean(half.iter().map(|d| d.attempts as f64));
    let rate = |half: &[DailyPerformance]| mean(half.iter().map(|d| d.success_rate));
    let contestants =
        |half: &[DailyPerformance]| mean(half.iter().map(|d| d.unique_contestants as f64));

    TrendAnalysis {
        attempts_growth: percent_change(attempts(first), attempts(second)),
        success_rate_change: round2(rate(second) - rate(first)),
        contestant_growth: percent_change(contestants(first), contestants(second)),
    }
}

pub fn performance_trends(
    season_id: Uuid,
    attempts: &[AttemptDetail],
    days: u32,
    now: DateTime<Utc>,
) -> PerformanceTrends {
    let daily = daily_performance(attempts, days, now);
    let trends = trend_analysis(&daily);
    PerformanceTrends {
        season_id,
        days,
        daily,
        trends,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{attempt::Attempt, card::CardSummary};
    use chrono::TimeZone;

    fn card(number: i32, difficulty: Difficulty, usage: i32) -> Card {
        let now = Utc::now();
        Card {
            id: Uuid::new_v4(),
            season_id: Uuid::nil(),
            difficulty,
            card_number: number,
            question: format!("Q{number}"),
            correct_answer: format!("A{number}"),
            usage_count: usage,
            last_used: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn attempt(
        card: &Card,
        contestant: &str,
        is_correct: bool,
        at: DateTime<Utc>,
    ) -> AttemptDetail {
        AttemptDetail {
            attempt: Attempt {
                id: Uuid::new_v4(),
                card_id: card.id,
                season_id: card.season_id,
                contestant_name: contestant.into(),
                given_answer: "x".into(),
                is_correct,
                attempted_at: at,
                recorded_by_id: Uuid::nil(),
            },
            card: CardSummary::from(card),
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn success_rate_rounds_and_handles_zero() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(1, 3), 33.33);
        assert_eq!(success_rate(2, 3), 66.67);
        assert_eq!(success_rate(4, 4), 100.0);
    }

    #[test]
    fn deck_status_of_empty_deck() {
        let status = deck_status(&[]);
        assert_eq!(status.total_cards, 0);
        assert_eq!(status.usage_percentage, 0.0);
    }

    #[test]
    fn deck_status_counts_used_cards() {
        let cards = vec![
            card(1, Difficulty::Easy, 2),
            card(2, Difficulty::Easy, 0),
            card(3, Difficulty::Easy, 1),
            card(4, Difficulty::Easy, 0),
        ];
        let status = deck_status(&cards);
        assert_eq!(status.used_cards, 2);
        assert_eq!(status.available_cards, 2);
        assert_eq!(status.usage_percentage, 50.0);
    }

    #[test]
    fn contestants_rank_by_rate_then_volume() {
        let c = card(1, Difficulty::Easy, 0);
        let attempts = vec![
            attempt(&c, "Ann", true, day(1)),
            attempt(&c, "Ann", false, day(1)),
            attempt(&c, "Bob", true, day(1)),
            attempt(&c, "Bob", true, day(1)),
            attempt(&c, "Cy", true, day(1)),
        ];
        let ranked = contestant_rankings(&attempts);
        let names: Vec<&str> = ranked.iter().map(|r| r.contestant_name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "Cy", "Ann"]);
        assert_eq!(ranked[2].success_rate, 50.0);
    }

    #[test]
    fn season_statistics_with_no_data() {
        let season = Season {
            id: Uuid::new_v4(),
            name: "Empty".into(),
            description: None,
            created_by_id: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let stats = season_statistics(&season, &[], &[]);
        assert_eq!(stats.total_cards, 0);
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.overall_success_rate, 0.0);
        assert!(stats.most_used_cards.is_empty());
        assert!(stats.least_used_cards.is_empty());
        assert_eq!(stats.difficulty_stats.len(), 3);
    }

    #[test]
    fn least_used_is_ascending_tail() {
        let season = Season {
            id: Uuid::new_v4(),
            name: "S".into(),
            description: None,
            created_by_id: Uuid::nil(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let cards: Vec<Card> = (1..=12).map(|n| card(n, Difficulty::Hard, n)).collect();
        let stats = season_statistics(&season, &cards, &[]);
        assert_eq!(stats.most_used_cards[0].usage_count, 12);
        assert_eq!(stats.most_used_cards.len(), 10);
        assert_eq!(stats.least_used_cards[0].usage_count, 1);
        assert_eq!(stats.least_used_cards[9].usage_count, 10);
    }

    #[test]
    fn trends_compare_halves() {
        let c = card(1, Difficulty::Medium, 0);
        let attempts = vec![
            attempt(&c, "Ann", true, day(1)),
            attempt(&c, "Ann", false, day(2)),
            attempt(&c, "Ann", true, day(3)),
            attempt(&c, "Bob", true, day(3)),
            attempt(&c, "Ann", true, day(4)),
            attempt(&c, "Bob", true, day(4)),
        ];
        let now = day(5);
        let daily = daily_performance(&attempts, 30, now);
        assert_eq!(daily.len(), 4);
        assert_eq!(daily[2].unique_contestants, 2);

        let trends = trend_analysis(&daily);
        // first half: 1 attempt/day, 50% success, 1 contestant
        // second half: 2 attempts/day, 100% success, 2 contestants
        assert_eq!(trends.attempts_growth, 100.0);
        assert_eq!(trends.success_rate_change, 50.0);
        assert_eq!(trends.contestant_growth, 100.0);
    }

    #[test]
    fn trends_outside_window_are_dropped() {
        let c = card(1, Difficulty::Medium, 0);
        let attempts = vec![attempt(&c, "Ann", true, day(1))];
        let daily = daily_performance(&attempts, 2, day(20));
        assert!(daily.is_empty());
        assert_eq!(trend_analysis(&daily), TrendAnalysis::default());
    }

    #[test]
    fn single_day_has_no_trend() {
        let c = card(1, Difficulty::Medium, 0);
        let attempts = vec![attempt(&c, "Ann", true, day(1))];
        let daily = daily_performance(&attempts, 30, day(2));
        assert_eq!(daily.len(), 1);
        assert_eq!(trend_analysis(&daily), TrendAnalysis::default());
    }

    #[test]
    fn unused_cards_grouped_by_difficulty() {
        let cards = vec![
            card(1, Difficulty::Easy, 0),
            card(2, Difficulty::Easy, 3),
            card(1, Difficulty::Hard, 0),
        ];
        let unused = unused_cards(&cards);
        assert_eq!(unused.total_unused, 2);
        assert_eq!(unused.easy.len(), 1);
        assert!(unused.medium.is_empty());
        assert_eq!(unused.hard.len(), 1);
    }
}
