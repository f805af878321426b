use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    errors::AppError,
    models::{
        attempt::{AttemptDetail, AttemptFilter},
        pagination::PageRequest,
    },
};

pub(crate) const ATTEMPT_COLUMNS: &str = "id, card_id, season_id, contestant_name, \
    given_answer, is_correct, attempted_at, recorded_by_id";

const DETAIL_COLUMNS: &str = "a.id, a.card_id, a.season_id, a.contestant_name, a.given_answer, \
     a.is_correct, a.attempted_at, a.recorded_by_id, \
     c.card_number, c.difficulty, c.question, c.correct_answer";

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &AttemptFilter) {
    builder.push(" WHERE TRUE");
    if let Some(season_id) = filter.season_id {
        builder.push(" AND a.season_id = ").push_bind(season_id);
    }
    if let Some(card_id) = filter.card_id {
        builder.push(" AND a.card_id = ").push_bind(card_id);
    }
    if let Some(ref name) = filter.contestant_name {
        builder
            .push(" AND a.contestant_name ILIKE ")
            .push_bind(format!("%{}%", escape_like(name)));
    }
    if let Some(ref name) = filter.exact_contestant {
        builder
            .push(" AND a.contestant_name = ")
            .push_bind(name.clone());
    }
    if let Some(since) = filter.since {
        builder.push(" AND a.attempted_at >= ").push_bind(since);
    }
}

/// Matching attempts joined with their card, newest first.
pub async fn get_attempts(
    filter: &AttemptFilter,
    page: Option<PageRequest>,
    postgres: &PgPool,
) -> Result<Vec<AttemptDetail>, AppError> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {DETAIL_COLUMNS} FROM attempts a JOIN cards c ON c.id = a.card_id"
    ));
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY a.attempted_at DESC, a.id");
    if let Some(page) = page {
        builder
            .push(" LIMIT ")
            .push_bind(page.limit as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
    }

    builder
        .build_query_as::<AttemptDetail>()
        .fetch_all(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch attempts: {}", e)))
}

pub async fn count_attempts(filter: &AttemptFilter, postgres: &PgPool) -> Result<u64, AppError> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM attempts a");
    push_filter(&mut builder, filter);

    let count = builder
        .build_query_scalar::<i64>()
        .fetch_one(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count attempts: {}", e)))?;

    Ok(count as u64)
}
