use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{
        User,
        pagination::PageRequest,
        user::Role,
    },
};

const USER_COLUMNS: &str = "id, name, email, role, created_at";

pub async fn get_user_by_id(user_id: Uuid, postgres: &PgPool) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(user_id)
        .fetch_optional(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))
}

pub async fn get_users(
    role: Option<Role>,
    page: PageRequest,
    postgres: &PgPool,
) -> Result<(Vec<User>, u64), AppError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3"
    ))
    .bind(role)
    .bind(page.limit as i64)
    .bind(page.offset() as i64)
    .fetch_all(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to fetch users: {}", e)))?;

    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
    )
    .bind(role)
    .fetch_one(postgres)
    .await
    .map_err(|e| AppError::DatabaseError(format!("Failed to count users: {}", e)))?;

    Ok((users, total as u64))
}

pub async fn count_users_by_role(postgres: &PgPool) -> Result<Vec<(Role, u64)>, AppError> {
    let rows = sqlx::query_as::<_, (Role, i64)>("SELECT role, COUNT(*) FROM users GROUP BY role")
        .fetch_all(postgres)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count roles: {}", e)))?;

    Ok(rows
        .into_iter()
        .map(|(role, count)| (role, count as u64))
        .collect())
}
